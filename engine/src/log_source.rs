//! Source of recent diagnostic text from the player.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::LogConfig;
use crate::error::{Error, Result};

pub trait LogSource {
    /// Text logged in the last `window`. Empty on any failure; failures are
    /// logged here and never surface to the caller.
    fn fetch_recent_events(&mut self, window: Duration) -> String;
}

impl<F> LogSource for F
where
    F: FnMut(Duration) -> String,
{
    fn fetch_recent_events(&mut self, window: Duration) -> String {
        self(window)
    }
}

/// Reads the macOS unified log through `log show`.
#[derive(Debug, Clone)]
pub struct UnifiedLog {
    program: PathBuf,
    predicate: String,
}

impl UnifiedLog {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            program: config.program.clone(),
            predicate: format!(
                "subsystem contains \"{}\" AND message contains \"{}\"",
                config.subsystem, config.sample_rate_marker
            ),
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    fn args(&self, window: Duration) -> Vec<String> {
        vec![
            "show".to_string(),
            "--predicate".to_string(),
            self.predicate.clone(),
            "--last".to_string(),
            format!("{}s", window_secs(window)),
            "--style".to_string(),
            "compact".to_string(),
        ]
    }

    pub fn try_fetch(&self, window: Duration) -> Result<String> {
        let output = Command::new(&self.program)
            .args(self.args(window))
            .output()
            .map_err(|source| Error::LogCommand {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::LogCommandStatus {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl LogSource for UnifiedLog {
    fn fetch_recent_events(&mut self, window: Duration) -> String {
        match self.try_fetch(window) {
            Ok(text) => {
                debug!(bytes = text.len(), "fetched log window");
                text
            }
            Err(e) => {
                warn!("log fetch failed: {e}");
                String::new()
            }
        }
    }
}

/// Whole seconds, rounded up, never below one.
fn window_secs(window: Duration) -> u64 {
    let secs = window.as_secs() + u64::from(window.subsec_nanos() > 0);
    secs.max(1)
}
