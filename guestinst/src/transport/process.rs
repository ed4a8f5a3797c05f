//! Guest console backed by a spawned process.

use std::process::Stdio;
use std::time::Duration;

use futures_util::future::try_join;
use log::{debug, info};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use super::config::SpawnConfig;
use super::status::GuestStatus;
use super::{Console, Interact};
use crate::channel::{ChannelConfig, ConsoleChannel, Pattern};
use crate::config::InstallConfig;
use crate::error::{DriverError, Error, Result};

/// Console session over the stdin/stdout of a child process.
///
/// The child is killed if this is dropped before it exits.
pub struct GuestConsole {
    channel: ConsoleChannel<ChildStdout, ChildStdin>,
    child: Child,
    program: String,
}

impl GuestConsole {
    /// Start the console process.
    pub fn spawn(spawn: &SpawnConfig, config: &InstallConfig) -> Result<Self> {
        let program = spawn.display_program();

        let mut cmd = Command::new(&spawn.program);
        cmd.args(&spawn.args)
            .envs(spawn.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &spawn.current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| DriverError::SpawnFailed {
            program: program.clone(),
            source,
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or(DriverError::MissingStream { stream: "stdin" })?;
        let stdout = child
            .stdout
            .take()
            .ok_or(DriverError::MissingStream { stream: "stdout" })?;

        info!("started console process {} (pid {:?})", program, child.id());

        Ok(Self {
            channel: ConsoleChannel::new(stdout, stdin, ChannelConfig::from(config)),
            child,
            program,
        })
    }

    /// OS process id of the console process, while it is running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Name of the console program.
    pub fn program(&self) -> &str {
        &self.program
    }

}

impl Console for GuestConsole {
    async fn expect(&mut self, pattern: &Pattern, timeout: Option<Duration>) -> Result<Vec<u8>> {
        self.channel.expect(pattern, timeout).await
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        self.channel.send(text).await
    }

    async fn wait(&mut self) -> Result<GuestStatus> {
        // Keep reading so the child never blocks on a full pipe while exiting.
        let channel = &mut self.channel;
        let child = &mut self.child;
        let exit = async {
            child
                .wait()
                .await
                .map_err(|e| Error::from(DriverError::WaitFailed(e)))
        };

        let ((), status) = try_join(channel.drain(), exit).await?;
        let status = GuestStatus::from(status);
        debug!("console process {} finished: {}", self.program, status);
        Ok(status)
    }
}

impl Interact for GuestConsole {
    async fn interact(self) -> Result<()> {
        self.channel
            .splice(tokio::io::stdin(), tokio::io::stdout())
            .await?;
        debug!("interactive session with {} ended", self.program);
        Ok(())
    }
}
