//! Guest process exit status.

use std::process::ExitStatus;

use crate::error::{DriverError, Result};

/// Exit code reported when the guest status carries no code.
const UNKNOWN_EXIT_CODE: i32 = 1;

/// Final status of the guest console process.
///
/// A nonzero status is a normal result of an install, not an error. Callers
/// that want failure semantics use [`into_result`](Self::into_result).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestStatus {
    code: Option<i32>,
    signal: Option<i32>,
}

impl GuestStatus {
    /// Status of a guest that exited with `code`.
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Status of a guest killed by `signal`.
    pub fn from_signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn signal(&self) -> Option<i32> {
        self.signal
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The code this process should exit with to pass the status on.
    ///
    /// Signal deaths follow the shell convention of `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match (self.code, self.signal) {
            (Some(code), _) => code,
            (None, Some(signal)) => 128 + signal,
            (None, None) => UNKNOWN_EXIT_CODE,
        }
    }

    /// Turn a nonzero status into [`DriverError::GuestExitNonZero`].
    pub fn into_result(self) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(DriverError::GuestExitNonZero { code: self.code }.into())
        }
    }
}

impl From<ExitStatus> for GuestStatus {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl std::fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit status {}", code),
            (None, Some(signal)) => write!(f, "killed by signal {}", signal),
            (None, None) => write!(f, "unknown status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_success() {
        let status = GuestStatus::from_code(0);
        assert!(status.success());
        assert_eq!(status.exit_code(), 0);
        assert!(status.into_result().is_ok());
    }

    #[test]
    fn test_nonzero_into_result() {
        let status = GuestStatus::from_code(1);
        assert!(!status.success());
        assert_eq!(status.exit_code(), 1);
        assert!(matches!(
            status.into_result(),
            Err(Error::Driver(DriverError::GuestExitNonZero { code: Some(1) }))
        ));
    }

    #[test]
    fn test_signal_exit_code() {
        let status = GuestStatus::from_signal(9);
        assert_eq!(status.code(), None);
        assert_eq!(status.exit_code(), 137);
        assert_eq!(status.to_string(), "killed by signal 9");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_exit_status() {
        use std::os::unix::process::ExitStatusExt;

        let status = GuestStatus::from(ExitStatus::from_raw(3 << 8));
        assert_eq!(status.code(), Some(3));
        assert_eq!(status.signal(), None);
    }
}
