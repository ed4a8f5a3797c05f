//! Builder for creating install drivers.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::installer::InstallDriver;
use super::script::InstallScript;
use crate::config::InstallConfig;
use crate::error::{DriverError, Result};
use crate::transport::{GuestConsole, SpawnConfig};

/// Builder for constructing install drivers.
///
/// # Example
///
/// ```rust,no_run
/// use guestinst::InstallerBuilder;
///
/// # async fn example() -> Result<(), guestinst::Error> {
/// let driver = InstallerBuilder::new("virsh")
///     .args(["console", "netbsd"])
///     .filter_output(true)
///     .spawn()?;
///
/// let status = driver.run_install_sequence().await?;
/// std::process::exit(status.exit_code());
/// # }
/// ```
pub struct InstallerBuilder {
    spawn: SpawnConfig,
    config: InstallConfig,
    script: Option<InstallScript>,
}

impl InstallerBuilder {
    /// Create a new builder for the given console program.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            spawn: SpawnConfig::new(program),
            config: InstallConfig::default(),
            script: None,
        }
    }

    /// Add an argument for the console program.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.spawn.args.push(arg.into());
        self
    }

    /// Add arguments for the console program.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.spawn.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the console program.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.spawn.envs.push((key.into(), value.into()));
        self
    }

    /// Set the console program's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spawn.current_dir = Some(dir.into());
        self
    }

    /// Replace the whole install configuration.
    pub fn config(mut self, config: InstallConfig) -> Self {
        self.config = config;
        self
    }

    /// Suppress echoing console output to the log (default: off).
    pub fn filter_output(mut self, filter: bool) -> Self {
        self.config.filter_output = filter;
        self
    }

    /// Set the pause between a shell prompt and the command (default: 1s).
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the shell prompt marker (default: `"\n# "`).
    pub fn shell_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.shell_prompt = prompt.into();
        self
    }

    /// Limit every pattern wait. By default waits are unbounded.
    pub fn pattern_timeout(mut self, timeout: Duration) -> Self {
        self.config.pattern_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Set how many unmatched bytes are kept for matching.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = depth;
        self
    }

    /// Enable or disable escape sequence stripping (default: on).
    pub fn strip_ansi(mut self, strip: bool) -> Self {
        self.config.strip_ansi = strip;
        self
    }

    /// Attach the caller's opaque parameter.
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.config.param = Some(param.into());
        self
    }

    /// Run a custom script instead of the base install.
    pub fn script(mut self, script: InstallScript) -> Self {
        self.script = Some(script);
        self
    }

    /// Validate the configuration and return the parts the driver needs.
    fn finish(self) -> Result<(SpawnConfig, InstallConfig, InstallScript)> {
        if self.spawn.program.is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "console program must not be empty".to_string(),
            }
            .into());
        }
        self.config.validate()?;

        let script = self.script.unwrap_or_else(InstallScript::netbsd_base);
        script.validate(self.config.search_depth)?;
        Ok((self.spawn, self.config, script))
    }

    /// Start the console program and return a driver attached to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> Result<InstallDriver<GuestConsole>> {
        let (spawn, config, script) = self.finish()?;
        let console = GuestConsole::spawn(&spawn, &config)?;
        InstallDriver::with_script(console, config, script)
    }
}
