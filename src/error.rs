//! Error types for bringing up the display link and the PWM channels.

use std::path::PathBuf;

/// Errors that can occur while setting up the bridge.
///
/// All of these are fatal at startup. Once the poll loop is running, write
/// failures are logged by the capability that hit them and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The serial device could not be opened.
    #[error("Can't open serial device {path}: {source}")]
    SerialOpen {
        /// Device path that was tried.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// `stty` could not be run at all.
    #[error("Can't run {program} to configure the serial line: {source}")]
    SttyUnavailable {
        /// Program that was tried.
        program: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// `stty` refused to configure the serial device.
    #[error("Can't configure serial device {path} (stty exit status: {status})")]
    SerialConfig {
        /// Device path that was tried.
        path: PathBuf,
        /// Exit status reported by `stty`.
        status: std::process::ExitStatus,
    },

    /// The display does not speak at the requested baud rate.
    #[error("Unsupported baud rate {0}")]
    UnsupportedBaud(u32),

    /// A PWM channel could not be exported or enabled.
    #[error("Can't initialise PWM channel {channel} at {path}: {source}")]
    PwmSetup {
        /// Channel number on the PWM chip.
        channel: u32,
        /// Sysfs attribute that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Any other I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
