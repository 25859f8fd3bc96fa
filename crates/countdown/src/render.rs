//! Human-readable output for the one-shot subcommands

use countdown_api::{EventPayload, TimerView};

/// Short state label for a timer
pub fn state_label(view: &TimerView) -> &'static str {
    let timer = &view.timer;
    if timer.is_running {
        "running"
    } else if timer.is_finished() {
        "done"
    } else if timer.remaining_time < timer.duration {
        "paused"
    } else {
        "ready"
    }
}

/// One table row: id, state, remaining time, progress and title
pub fn render_timer_line(view: &TimerView) -> String {
    let mut line = format!(
        "{:<36}  {:<7}  {:>8}  {:>3.0}%  {}",
        view.timer.id.as_str(),
        state_label(view),
        view.remaining_display,
        view.progress_pct,
        view.timer.title
    );
    if !view.timer.description.is_empty() {
        line.push_str(&format!(" ({})", view.timer.description));
    }
    line
}

/// Render a protocol event for a person, if it carries anything to show
pub fn render_payload(payload: &EventPayload) -> Option<String> {
    match payload {
        EventPayload::TimerAdded { timer } => {
            Some(format!("Added {}", render_timer_line(timer)))
        }
        EventPayload::TimerUpdated { timer, .. } => {
            Some(format!("Updated {}", render_timer_line(timer)))
        }
        EventPayload::TimerDeleted { id } => Some(format!("Deleted {}", id)),
        EventPayload::TimerExpired { message, .. } => Some(message.clone()),
        EventPayload::Timers { timers } if timers.is_empty() => Some("No timers".into()),
        EventPayload::Timers { timers } => Some(
            timers
                .iter()
                .map(render_timer_line)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        EventPayload::ValidationFailed { message } => Some(format!("Invalid timer: {}", message)),
        EventPayload::StorageWarning { message } => Some(format!("Warning: {}", message)),
        EventPayload::Error(info) => Some(format!("Error: {}", info.message)),
        EventPayload::Pong | EventPayload::Shutdown => None,
    }
}
