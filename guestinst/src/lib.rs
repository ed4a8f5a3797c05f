//! # Guestinst
//!
//! Async serial-console driver for unattended guest OS installs.
//!
//! Guestinst attaches to a booting guest's console (any process whose
//! stdin/stdout is the console, e.g. `virsh console`), waits for known prompts
//! and types the answers, much like Python's pexpect.
//!
//! ## Features
//!
//! - Fixed, linear install scripts: wait for a prompt, send keystrokes
//! - Indefinite waits by default, optional per-wait timeouts
//! - Settle delay before typing at a freshly drawn shell prompt
//! - Sliding-window output buffer with ANSI escape stripping
//! - Console echo to the log, switchable per driver
//! - Interactive hand-off for debugging a stuck install
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guestinst::InstallerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), guestinst::Error> {
//!     let driver = InstallerBuilder::new("virsh")
//!         .args(["console", "netbsd-base"])
//!         .spawn()?;
//!
//!     let status = driver.run_install_sequence().await?;
//!     println!("guest finished: {}", status);
//!     std::process::exit(status.exit_code());
//! }
//! ```

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod transport;

// Re-export main types for convenience
pub use channel::Pattern;
pub use config::InstallConfig;
pub use driver::{InstallDriver, InstallScript, InstallerBuilder, Step, StepReport};
pub use error::Error;
pub use transport::{Console, GuestConsole, GuestStatus, Interact};
