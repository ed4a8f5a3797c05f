//! Install scripts: fixed, ordered prompt/response steps.
//!
//! A script is a list of steps executed strictly in order. There is no
//! branching and nothing is retried; each step only starts once the previous
//! one has sent its input.

use std::borrow::Cow;
use std::fmt;

use crate::channel::Pattern;
use crate::error::{DriverError, Result};

/// Countdown shown by the boot loader before it boots the default entry.
pub const BOOT_COUNTDOWN: &str = "seconds";

/// Boot menu choice for single-user mode.
pub const SINGLE_USER_CHOICE: &str = "2";

/// Question asked by init before starting the single-user shell.
pub const SHELL_QUESTION: &str = "Enter pathname of shell or RETURN for /bin/sh:";

/// One step of an install script.
#[derive(Debug, Clone)]
pub enum Step {
    /// Wait for `pattern`, then send `text` exactly as given.
    Respond { pattern: Pattern, text: String },

    /// Wait for the shell prompt, let the console settle, then send the
    /// command followed by a newline.
    Command(String),
}

impl Step {
    pub fn respond(pattern: impl Into<Pattern>, text: impl Into<String>) -> Self {
        Step::Respond {
            pattern: pattern.into(),
            text: text.into(),
        }
    }

    pub fn command(command: impl Into<String>) -> Self {
        Step::Command(command.into())
    }

    /// Exactly what this step transmits.
    pub fn transmission(&self) -> Cow<'_, str> {
        match self {
            Step::Respond { text, .. } => Cow::Borrowed(text),
            Step::Command(command) => Cow::Owned(format!("{}\n", command)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Respond { pattern, text } => write!(f, "wait for {}, send {:?}", pattern, text),
            Step::Command(command) => write!(f, "run `{}`", command),
        }
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default)]
pub struct InstallScript {
    steps: Vec<Step>,
}

impl InstallScript {
    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::default()
    }

    /// The base install: boot to single-user mode, run `base.sh` from the
    /// install media, unmount everything and power off.
    pub fn netbsd_base() -> Self {
        Self::builder()
            // the guest only waits a few seconds here
            .respond(BOOT_COUNTDOWN, SINGLE_USER_CHOICE)
            .respond(SHELL_QUESTION, "\n")
            .command("mount -rt cd9660 /dev/cd1 /mnt")
            .command("/bin/sh -x /mnt/base.sh")
            .command("umount /targetroot")
            .command("umount /mnt")
            .command("halt -p")
            .build()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Everything the script transmits, in order.
    pub fn transmissions(&self) -> Vec<Cow<'_, str>> {
        self.steps.iter().map(Step::transmission).collect()
    }

    /// Check that every response pattern can match within `search_depth`
    /// bytes of buffered output.
    ///
    /// Empty literals are rejected as well, since they match before the
    /// guest has printed anything.
    pub fn validate(&self, search_depth: usize) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            let Step::Respond { pattern, .. } = step else {
                continue;
            };
            match pattern.max_len() {
                Some(0) => {
                    return Err(DriverError::InvalidConfig {
                        message: format!("step {} waits for an empty pattern", index + 1),
                    }
                    .into());
                }
                Some(len) if len > search_depth => {
                    return Err(DriverError::InvalidConfig {
                        message: format!(
                            "search_depth ({}) is shorter than the {}-byte pattern {} of step {}",
                            search_depth,
                            len,
                            pattern,
                            index + 1
                        ),
                    }
                    .into());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Builder for install scripts.
///
/// # Example
///
/// ```rust
/// use guestinst::driver::InstallScript;
///
/// let script = InstallScript::builder()
///     .respond("login:", "root\n")
///     .command("uname -a")
///     .command("halt -p")
///     .build();
///
/// assert_eq!(script.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    steps: Vec<Step>,
}

impl ScriptBuilder {
    /// Wait for a literal `pattern`, then send `text`.
    pub fn respond(mut self, pattern: impl Into<Pattern>, text: impl Into<String>) -> Self {
        self.steps.push(Step::respond(pattern, text));
        self
    }

    /// Run a shell command at the next shell prompt.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.steps.push(Step::command(command));
        self
    }

    pub fn build(self) -> InstallScript {
        InstallScript { steps: self.steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_script_transmissions() {
        let script = InstallScript::netbsd_base();
        assert_eq!(
            script.transmissions(),
            vec![
                "2",
                "\n",
                "mount -rt cd9660 /dev/cd1 /mnt\n",
                "/bin/sh -x /mnt/base.sh\n",
                "umount /targetroot\n",
                "umount /mnt\n",
                "halt -p\n",
            ]
        );
    }

    #[test]
    fn test_base_script_patterns() {
        let script = InstallScript::netbsd_base();
        match &script.steps()[0] {
            Step::Respond { pattern, .. } => assert_eq!(pattern.as_str(), "seconds"),
            other => panic!("unexpected first step: {}", other),
        }
        match &script.steps()[1] {
            Step::Respond { pattern, .. } => {
                assert_eq!(pattern.as_str(), "Enter pathname of shell or RETURN for /bin/sh:")
            }
            other => panic!("unexpected second step: {}", other),
        }
        assert!(script.steps()[2..]
            .iter()
            .all(|s| matches!(s, Step::Command(_))));
    }

    #[test]
    fn test_respond_sends_text_verbatim() {
        // No newline is added to responses
        assert_eq!(Step::respond("seconds", "2").transmission(), "2");
        assert_eq!(Step::command("halt -p").transmission(), "halt -p\n");
    }

    #[test]
    fn test_validate_against_search_depth() {
        let script = InstallScript::netbsd_base();
        assert!(script.validate(4096).is_ok());
        assert!(script.validate(SHELL_QUESTION.len()).is_ok());
        // Deep enough for the countdown and the shell prompt, not for the
        // shell question
        assert!(script.validate(16).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pattern() {
        let script = InstallScript::builder().respond("", "2").build();
        assert!(script.validate(4096).is_err());
    }

    #[test]
    fn test_validate_ignores_regex_length() {
        let script = InstallScript::builder()
            .respond(Pattern::regex(r"Booting in [0-9]+ seconds").unwrap(), "2")
            .build();
        assert!(script.validate(8).is_ok());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::command("umount /mnt").to_string(), "run `umount /mnt`");
        assert_eq!(
            Step::respond("seconds", "2").to_string(),
            r#"wait for "seconds", send "2""#
        );
    }
}
