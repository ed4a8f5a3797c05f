//! Error types for guestinst.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for guestinst operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Console channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Console channel errors (pattern waits, keystroke transmission).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The guest side of the console went away.
    ///
    /// `pattern` is what was being waited for, empty if the session closed
    /// while sending.
    #[error("Session closed{}", waiting_for(.pattern))]
    SessionClosed { pattern: String },

    /// Reading the console failed before the pattern appeared.
    #[error("Failed to match {pattern:?}: {source}")]
    MatchFailure {
        pattern: String,
        #[source]
        source: io::Error,
    },

    /// Pattern not seen within the configured timeout
    #[error("Pattern {pattern:?} not found within {timeout:?}")]
    PatternTimeout { pattern: String, timeout: Duration },

    /// Writing to the console failed
    #[error("Failed to send to console: {source}")]
    SendFailed {
        #[source]
        source: io::Error,
    },

    /// Copying between the console and the local terminal failed
    #[error("Interactive hand-off failed: {0}")]
    HandOff(#[source] io::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

fn waiting_for(pattern: &str) -> String {
    if pattern.is_empty() {
        " while sending".to_string()
    } else {
        format!(" while waiting for {:?}", pattern)
    }
}

/// Driver errors (guest process lifecycle, configuration).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The console command could not be started
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A standard stream of the child was not captured
    #[error("Console process has no {stream}")]
    MissingStream { stream: &'static str },

    /// Waiting for the guest process failed
    #[error("Failed to wait for guest process: {0}")]
    WaitFailed(#[source] io::Error),

    /// Invalid configuration in the installer builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The guest exited with a nonzero status
    #[error("Guest exited with nonzero status (code {code:?})")]
    GuestExitNonZero { code: Option<i32> },
}

/// Result type alias using guestinst's Error.
pub type Result<T> = std::result::Result<T, Error>;
