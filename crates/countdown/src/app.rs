//! Command handling for a countdown session

use anyhow::{Context, Result};
use countdown_api::{Command, ErrorCode, ErrorInfo, EventPayload, UpdateReason};
use countdown_config::Settings;
use countdown_core::{
    CollectingReporter, CoreEngine, CoreEvent, ExpiryDispatcher, TimerForm, TimerStore,
};
use countdown_host_api::{AlertPlayer, Notifier, expiry_message};
use countdown_store::{SqliteStore, Store, TimerSlot};
use countdown_util::{Clock, IdGenerator, SystemClock, UuidIds};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Open the configured database and build an engine over it.
///
/// The saved collection is loaded before returning.
pub fn open_engine(settings: &Settings) -> Result<CoreEngine> {
    let db_path = settings.storage.database_path();
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );
    if !store.is_healthy() {
        warn!(db_path = %db_path.display(), "Store opened but failed its health check");
    }
    info!(db_path = %db_path.display(), "Store initialized");

    let mut engine = build_engine(
        store,
        settings,
        Arc::new(UuidIds),
        Arc::new(SystemClock),
    );
    engine.load();
    Ok(engine)
}

/// Build an engine over an already opened store. Nothing is loaded.
pub fn build_engine(
    store: Arc<dyn Store>,
    settings: &Settings,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
) -> CoreEngine {
    let timers = TimerStore::new(
        store,
        TimerSlot::new(settings.storage.slot.clone()),
        ids,
        clock,
    );
    CoreEngine::new(timers, settings.alerts.repeat_count)
}

/// A running session: the engine plus the collaborators that surface expiry
pub struct App {
    engine: CoreEngine,
    dispatcher: ExpiryDispatcher,
}

impl App {
    pub fn new(
        engine: CoreEngine,
        notifier: Arc<dyn Notifier>,
        player: Arc<dyn AlertPlayer>,
    ) -> Self {
        Self {
            engine,
            dispatcher: ExpiryDispatcher::new(notifier, player),
        }
    }

    pub fn engine(&self) -> &CoreEngine {
        &self.engine
    }

    /// Whether the heartbeat should be polled
    pub fn needs_heartbeat(&self) -> bool {
        self.engine.needs_heartbeat()
    }

    /// Parse and run one protocol line
    pub async fn handle_line(&mut self, line: &str) -> Vec<EventPayload> {
        match Command::from_line(line) {
            Ok(command) => self.handle_command(command).await,
            Err(e) => {
                warn!(error = %e, "Invalid command line");
                vec![EventPayload::Error(ErrorInfo::new(
                    ErrorCode::InvalidCommand,
                    e.to_string(),
                ))]
            }
        }
    }

    pub async fn handle_command(&mut self, command: Command) -> Vec<EventPayload> {
        debug!(command = command.name(), "Handling command");

        let mut reporter = CollectingReporter::new();
        let events = match command {
            Command::Add {
                title,
                description,
                hours,
                minutes,
                seconds,
            } => {
                let form = TimerForm::new(title, description, hours, minutes, seconds);
                self.engine.add(&form, &mut reporter)
            }

            Command::Edit {
                id,
                title,
                description,
                hours,
                minutes,
                seconds,
            } => {
                let Some(current) = self.engine.get(&id) else {
                    debug!(timer_id = %id, "Edit of unknown timer ignored");
                    return Vec::new();
                };
                let mut form = TimerForm::from_timer(current);
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(description) = description {
                    form.description = description;
                }
                form.hours = hours.unwrap_or(form.hours);
                form.minutes = minutes.unwrap_or(form.minutes);
                form.seconds = seconds.unwrap_or(form.seconds);
                self.engine.edit(&id, &form, &mut reporter)
            }

            Command::Delete { id } => self.engine.delete(&id),
            Command::Toggle { id } => self.engine.toggle(&id),
            Command::Restart { id } => self.engine.restart(&id),
            Command::Dismiss { id } => self.engine.dismiss(&id),

            Command::List => {
                return vec![EventPayload::Timers {
                    timers: self.engine.list(),
                }];
            }

            Command::Ping => return vec![EventPayload::Pong],
        };

        let mut payloads: Vec<EventPayload> = reporter
            .messages
            .into_iter()
            .map(|message| EventPayload::ValidationFailed { message })
            .collect();
        payloads.extend(self.apply_core_events(events).await);
        payloads
    }

    /// Run one heartbeat
    pub async fn heartbeat(&mut self) -> Vec<EventPayload> {
        let events = self.engine.tick();
        self.apply_core_events(events).await
    }

    /// Dispatch core events to the collaborators and translate them into
    /// protocol events
    async fn apply_core_events(&self, events: Vec<CoreEvent>) -> Vec<EventPayload> {
        let mut payloads = Vec::new();
        for event in events {
            self.dispatcher.dispatch(&event).await;
            if let Some(payload) = to_payload(event) {
                payloads.push(payload);
            }
        }
        payloads
    }
}

fn to_payload(event: CoreEvent) -> Option<EventPayload> {
    match event {
        CoreEvent::TimerAdded { timer } => Some(EventPayload::TimerAdded {
            timer: timer.view(),
        }),
        CoreEvent::TimerEdited { timer } => Some(EventPayload::TimerUpdated {
            timer: timer.view(),
            reason: UpdateReason::Edited,
        }),
        CoreEvent::TimerToggled { timer, .. } => Some(EventPayload::TimerUpdated {
            timer: timer.view(),
            reason: UpdateReason::Toggled,
        }),
        CoreEvent::TimerRestarted { timer } => Some(EventPayload::TimerUpdated {
            timer: timer.view(),
            reason: UpdateReason::Restarted,
        }),
        CoreEvent::TimerDeleted { id, .. } => Some(EventPayload::TimerDeleted { id }),
        CoreEvent::Expired { id, title } => Some(EventPayload::TimerExpired {
            message: expiry_message(&title),
            id,
            title,
        }),
        CoreEvent::PersistFailed { operation, error } => Some(EventPayload::StorageWarning {
            message: format!("Could not save timers after {}: {}", operation, error),
        }),
        CoreEvent::AlertRepeat { .. } | CoreEvent::AlertCancelled { .. } => None,
    }
}
