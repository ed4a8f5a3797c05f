//! Install configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DriverError, Result};

/// Shell prompt printed by the single-user root shell.
pub const DEFAULT_SHELL_PROMPT: &str = "\n# ";

/// Configuration for one install run.
///
/// Every instance is independent, so several drivers can run side by side
/// (e.g. parallel test harnesses) with different settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Suppress echoing console output to the log.
    ///
    /// Only affects logging. The transmitted keystrokes are identical either way.
    pub filter_output: bool,

    /// Pause between a shell prompt match and the first command character.
    pub settle_delay_ms: u64,

    /// Marker that identifies a ready shell.
    pub shell_prompt: String,

    /// Optional limit on each pattern wait. `None` waits indefinitely.
    pub pattern_timeout_ms: Option<u64>,

    /// How many bytes of unmatched output are kept for matching.
    pub search_depth: usize,

    /// Strip terminal escape sequences before matching.
    pub strip_ansi: bool,

    /// Caller-specific value carried through the driver. Never interpreted.
    pub param: Option<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            filter_output: false,
            settle_delay_ms: 1000,
            shell_prompt: DEFAULT_SHELL_PROMPT.to_string(),
            pattern_timeout_ms: None,
            search_depth: 4096,
            strip_ansi: true,
            param: None,
        }
    }
}

impl InstallConfig {
    /// The settle delay as a `Duration`.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// The pattern wait timeout, if any.
    pub fn pattern_timeout(&self) -> Option<Duration> {
        self.pattern_timeout_ms.map(Duration::from_millis)
    }

    /// Check the configuration for values that can never match.
    pub fn validate(&self) -> Result<()> {
        if self.shell_prompt.is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "shell_prompt must not be empty".to_string(),
            }
            .into());
        }

        if self.search_depth < self.shell_prompt.len() {
            return Err(DriverError::InvalidConfig {
                message: format!(
                    "search_depth ({}) is shorter than the shell prompt",
                    self.search_depth
                ),
            }
            .into());
        }

        Ok(())
    }
}
