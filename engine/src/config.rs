use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::extract::{DEFAULT_BIT_DEPTH_MARKER, DEFAULT_SAMPLE_RATE_MARKER};

pub const CONFIG_ENV: &str = "RATESYNC_CONFIG";
pub const DEVICE_ENV: &str = "RATESYNC_DEVICE";
pub const JSON_ENV: &str = "RATESYNC_JSON";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub log: LogConfig,
    pub retry: RetryConfig,
    pub device: DeviceConfig,
    pub control: ControlConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub log_window_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5000,
            log_window_secs: 10,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn log_window(&self) -> Duration {
        Duration::from_secs(self.log_window_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub program: PathBuf,
    pub subsystem: String,
    pub sample_rate_marker: String,
    pub bit_depth_marker: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("/usr/bin/log"),
            subsystem: "com.apple.Music".to_string(),
            sample_rate_marker: DEFAULT_SAMPLE_RATE_MARKER.to_string(),
            bit_depth_marker: DEFAULT_BIT_DEPTH_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub settle_ms: u64,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            settle_ms: 100,
            backoff_ms: 200,
        }
    }
}

/// Which output device to drive. `name` wins over `index`; with neither the
/// system default output is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: Option<String>,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    pub client_name: String,
    pub port_name: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            client_name: "ratesync".to_string(),
            port_name: "ratesync-out".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// `path` is only used to label errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Apply `RATESYNC_DEVICE` on top of whatever was loaded.
    pub fn apply_env(&mut self) {
        self.override_device_name(std::env::var(DEVICE_ENV).ok().as_deref());
    }

    /// A non-blank `name` replaces the configured device name. Blank or
    /// absent values leave the configuration alone.
    pub fn override_device_name(&mut self, name: Option<&str>) {
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            self.device.name = Some(name.to_string());
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| Error::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.monitor.poll_interval_ms == 0 {
            return Err(invalid("monitor.poll_interval_ms must be greater than 0"));
        }
        if self.monitor.log_window_secs == 0 {
            return Err(invalid("monitor.log_window_secs must be greater than 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts must be at least 1"));
        }
        if self.log.sample_rate_marker.is_empty() || self.log.bit_depth_marker.is_empty() {
            return Err(invalid("log markers must not be empty"));
        }
        Ok(())
    }
}
