//! Sound process management

use countdown_host_api::{HostError, HostResult};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// A running sound-player child process.
///
/// The child is killed if this value is dropped before it exits.
pub struct SoundProcess {
    child: Child,
    pid: Option<u32>,
}

impl SoundProcess {
    /// Spawn `argv` with all standard streams detached
    pub fn spawn(argv: &[String]) -> HostResult<Self> {
        let Some((program, args)) = argv.split_first() else {
            return Err(HostError::PlaybackFailed("Empty argv".into()));
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HostError::PlaybackFailed(format!("Failed to spawn {}: {}", program, e)))?;

        let pid = child.id();
        debug!(program = %program, pid = ?pid, "Sound process spawned");

        Ok(Self { child, pid })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Check if the process is still running (non-blocking)
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the process and reap it
    pub async fn stop(mut self) -> HostResult<()> {
        if !self.is_running() {
            return Ok(());
        }

        match self.child.kill().await {
            Ok(()) => {
                debug!(pid = ?self.pid, "Sound process killed");
                Ok(())
            }
            // Exited between the check and the kill
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(HostError::PlaybackFailed(format!(
                "Failed to kill sound process: {}",
                e
            ))),
        }
    }
}
