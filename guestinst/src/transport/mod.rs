//! Console transport: the guest side of an install session.
//!
//! The driver only needs a handful of capabilities from whatever sits on the
//! other end of the console. They are captured by [`Console`] (scripted use)
//! and [`Interact`] (handing the session to a person). [`GuestConsole`]
//! provides both on top of a spawned child process.

pub mod config;
mod process;
mod status;

pub use config::SpawnConfig;
pub use process::GuestConsole;
pub use status::GuestStatus;

use std::future::Future;
use std::time::Duration;

use crate::channel::Pattern;
use crate::error::Result;

/// A live console session to a guest.
pub trait Console: Send {
    /// Wait until `pattern` appears in the guest output.
    ///
    /// `None` waits indefinitely. Fails if the session ends or errors first.
    /// Returns the output that preceded the match.
    fn expect(
        &mut self,
        pattern: &Pattern,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Transmit `text` to the guest, one character at a time.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait for the guest to go away and report how it exited.
    fn wait(&mut self) -> impl Future<Output = Result<GuestStatus>> + Send;
}

/// A console that can be handed over to an interactive user.
pub trait Interact: Console + Sized {
    /// Stop echoing output and connect the session to the local terminal
    /// until either side closes.
    ///
    /// Implementations reading `tokio::io::stdin` may leave a blocking read
    /// behind; see [`crate::driver::hand_off`].
    fn interact(self) -> impl Future<Output = Result<()>> + Send;
}
