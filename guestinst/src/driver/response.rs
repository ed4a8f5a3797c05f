//! Report for an executed install step.

use std::time::Duration;

/// What happened during one step.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Position of the step in the script, starting at 0.
    pub index: usize,

    /// The pattern that was waited for.
    pub pattern: String,

    /// The text that was transmitted.
    pub sent: String,

    /// Console output seen before the pattern matched.
    pub output: String,

    /// Time from the start of the wait until the last character was sent.
    pub elapsed: Duration,
}

impl StepReport {
    pub fn new(
        index: usize,
        pattern: impl Into<String>,
        sent: impl Into<String>,
        output: &[u8],
        elapsed: Duration,
    ) -> Self {
        Self {
            index,
            pattern: pattern.into(),
            sent: sent.into(),
            output: String::from_utf8_lossy(output).into_owned(),
            elapsed,
        }
    }
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output)
    }
}
