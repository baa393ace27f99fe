//! Error type shared by every engine component.
//!
//! Hardware failures carry the raw `OSStatus` so the symbolic name can be
//! rendered by [`crate::hw::error_fmt::os_status`]. Only startup errors end
//! the process; inside the monitor loop an error ends at most one field.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::hw::error_fmt::os_status;

/// Errors produced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A HAL property read or write returned a non-zero status.
    #[error("CoreAudio {operation} failed: {}", os_status(*status))]
    CoreAudio {
        /// What was being done, e.g. `set nominal sample rate`.
        operation: &'static str,
        /// Raw `OSStatus`.
        status: i32,
    },
    /// A CoreMIDI call returned a non-zero status.
    #[error("CoreMIDI {operation} failed: OSStatus {status}")]
    CoreMidi {
        operation: &'static str,
        status: i32,
    },
    /// The log retrieval process could not be spawned or read.
    #[error("failed to run log command `{program}`: {source}")]
    LogCommand {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The log retrieval process exited unsuccessfully.
    #[error("log command exited with {status}: {stderr}")]
    LogCommandStatus { status: ExitStatus, stderr: String },
    /// Bit depth outside of 16/24/32.
    #[error("unsupported bit depth {0} (supported: 16, 24, 32)")]
    UnsupportedBitDepth(u32),
    #[error("audio device not found: {0}")]
    DeviceNotFound(String),
    #[error("no audio devices with output channels")]
    NoOutputDevices,
    #[error("{0} requires macOS")]
    PlatformUnsupported(&'static str),
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[cfg(any(test, target_os = "macos"))]
    pub(crate) fn core_audio(operation: &'static str, status: i32) -> Self {
        Self::CoreAudio { operation, status }
    }
}
