//! Audible alert player

use async_trait::async_trait;
use countdown_host_api::{AlertPlayer, HostResult};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::SoundProcess;

const BELL: &[u8] = b"\x07";

/// Plays a sound file through an external player, or rings the terminal bell
/// when no sound is configured.
///
/// Only one sound process runs at a time; playing again restarts it.
pub struct SoundAlertPlayer {
    argv: Option<Vec<String>>,
    bell: bool,
    current: Mutex<Option<SoundProcess>>,
}

impl SoundAlertPlayer {
    /// `player` is the command prefix; the sound path is appended to it.
    pub fn new(sound: Option<PathBuf>, player: &[String], bell: bool) -> Self {
        let argv = sound.map(|sound| {
            let mut argv = player.to_vec();
            argv.push(sound.to_string_lossy().into_owned());
            argv
        });

        Self {
            argv,
            bell,
            current: Mutex::new(None),
        }
    }

    /// Command line used for each alert, if a sound is configured
    pub fn argv(&self) -> Option<&[String]> {
        self.argv.as_deref()
    }

    fn ring_bell(&self) -> HostResult<()> {
        if !self.bell {
            debug!("Alert muted");
            return Ok(());
        }
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(BELL)?;
        stderr.flush()?;
        Ok(())
    }

    /// Kill any sound still playing
    pub async fn shutdown(&self) {
        if let Err(e) = self.stop_alert().await {
            warn!(error = %e, "Failed to stop alert on shutdown");
        }
    }

    #[cfg(test)]
    async fn is_sounding(&self) -> bool {
        match self.current.lock().await.as_mut() {
            Some(proc) => proc.is_running(),
            None => false,
        }
    }
}

#[async_trait]
impl AlertPlayer for SoundAlertPlayer {
    async fn play_alert(&self) -> HostResult<()> {
        let Some(argv) = &self.argv else {
            return self.ring_bell();
        };

        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            previous.stop().await?;
        }

        *current = Some(SoundProcess::spawn(argv)?);
        Ok(())
    }

    async fn stop_alert(&self) -> HostResult<()> {
        let previous = self.current.lock().await.take();
        match previous {
            Some(proc) => {
                debug!(pid = ?proc.pid(), "Stopping alert sound");
                proc.stop().await
            }
            None => Ok(()),
        }
    }
}
