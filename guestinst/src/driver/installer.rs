//! The install driver: runs a script against a console, then waits for the guest.

use std::time::Instant;

use log::{debug, info, warn};

use super::response::StepReport;
use super::script::{InstallScript, Step};
use crate::channel::Pattern;
use crate::config::InstallConfig;
use crate::error::Result;
use crate::transport::{Console, GuestStatus};

/// Drives one unattended install over a console session.
///
/// The driver is a linear state machine. Its state is the index of the next
/// script step; every step advances it by one and the final state is the
/// guest having exited.
pub struct InstallDriver<C> {
    /// Console session, owned for the whole install.
    console: C,

    /// Settings for this run.
    config: InstallConfig,

    /// Script to execute.
    script: InstallScript,

    /// Compiled shell prompt marker.
    shell_prompt: Pattern,

    /// Index of the next step to run.
    position: usize,
}

impl<C: Console> InstallDriver<C> {
    /// Create a driver running the base install script.
    pub fn new(console: C, config: InstallConfig) -> Result<Self> {
        Self::with_script(console, config, InstallScript::netbsd_base())
    }

    /// Create a driver running a custom script.
    ///
    /// Fails if the shell prompt or any response pattern could never match
    /// under `config`.
    pub fn with_script(console: C, config: InstallConfig, script: InstallScript) -> Result<Self> {
        config.validate()?;
        script.validate(config.search_depth)?;

        let shell_prompt = Pattern::literal(config.shell_prompt.as_str());
        Ok(Self {
            console,
            config,
            script,
            shell_prompt,
            position: 0,
        })
    }

    /// The caller's opaque parameter, passed through untouched.
    pub fn param(&self) -> Option<&str> {
        self.config.param.as_deref()
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    pub fn script(&self) -> &InstallScript {
        &self.script
    }

    /// Index of the next step to run.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Steps not yet run.
    pub fn remaining(&self) -> usize {
        self.script.len() - self.position
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Give up the console, e.g. to hand it to an interactive user.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Wait for `pattern`, then send `text` one character at a time.
    ///
    /// Nothing is sent before the pattern is seen and no newline is added.
    pub async fn await_and_send(&mut self, pattern: &Pattern, text: &str) -> Result<StepReport> {
        let start = Instant::now();

        let output = self
            .console
            .expect(pattern, self.config.pattern_timeout())
            .await?;
        self.console.send(text).await?;

        Ok(StepReport::new(
            self.position,
            pattern.as_str(),
            text,
            &output,
            start.elapsed(),
        ))
    }

    /// Wait for the shell prompt, pause for the settle delay, then send
    /// `command` followed by a newline.
    ///
    /// Returns as soon as the command is transmitted. Its result is not
    /// checked; the next prompt wait is what confirms it finished.
    pub async fn run_command(&mut self, command: &str) -> Result<StepReport> {
        let start = Instant::now();

        let output = self
            .console
            .expect(&self.shell_prompt, self.config.pattern_timeout())
            .await?;

        let settle = self.config.settle_delay();
        debug!("prompt seen, settling for {:?}", settle);
        tokio::time::sleep(settle).await;

        let line = format!("{}\n", command);
        self.console.send(&line).await?;

        Ok(StepReport::new(
            self.position,
            self.shell_prompt.as_str(),
            line,
            &output,
            start.elapsed(),
        ))
    }

    /// Run the next step of the script, if any.
    pub async fn run_next_step(&mut self) -> Result<Option<StepReport>> {
        let Some(step) = self.script.steps().get(self.position).cloned() else {
            return Ok(None);
        };

        info!(
            "step {}/{}: {}",
            self.position + 1,
            self.script.len() + 1,
            step
        );

        let report = match &step {
            Step::Respond { pattern, text } => self.await_and_send(pattern, text).await?,
            Step::Command(command) => self.run_command(command).await?,
        };

        self.position += 1;
        Ok(Some(report))
    }

    /// Run up to `count` further steps.
    pub async fn run_steps(&mut self, count: usize) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            match self.run_next_step().await? {
                Some(report) => reports.push(report),
                None => break,
            }
        }
        Ok(reports)
    }

    /// Run the rest of the script, then wait for the guest to exit.
    ///
    /// The guest's exit status is the result, whatever its value. Any console
    /// failure ends the sequence immediately.
    pub async fn run_install_sequence(mut self) -> Result<GuestStatus> {
        if let Some(param) = self.param() {
            debug!("install parameter: {:?}", param);
        }

        let remaining = self.remaining();
        self.run_steps(remaining).await?;

        info!(
            "step {}/{}: wait for guest to exit",
            self.script.len() + 1,
            self.script.len() + 1
        );
        let status = self.console.wait().await?;

        if status.success() {
            info!("guest finished: {}", status);
        } else {
            warn!("guest finished: {}", status);
        }
        Ok(status)
    }
}
