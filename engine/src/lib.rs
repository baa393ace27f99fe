//! Follows a player's stream format on a hardware output device.
//!
//! The monitor polls recent log text, extracts sample rate and bit depth,
//! and when they change programs the selected output endpoint to match
//! (with verification, retries and rollback) before sending a timing pulse
//! to every control-channel destination.

pub mod broadcast;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod format;
pub mod hw;
pub mod inspect;
pub mod log_source;
pub mod monitor;
pub mod reconfigure;

pub use broadcast::{ControlChannel, PulseReport, SyncBroadcaster};
pub use config::Config;
pub use detect::{FormatChange, MonitorState};
pub use error::{Error, Result};
pub use extract::FormatExtractor;
pub use format::{AudioFormat, BitDepth, StreamDescriptor};
pub use hw::{DeviceId, DeviceInfo, DeviceSelector, Endpoint, SampleRateRange};
pub use log_source::{LogSource, UnifiedLog};
pub use monitor::{ChangeEvent, Monitor, MonitorSettings, TickSummary};
pub use reconfigure::{FieldOutcome, ReconfigurationReport, Reconfigurator, RetryPolicy};
