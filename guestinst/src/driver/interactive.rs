//! Interactive hand-off: give the console to a person and stop automating.
//!
//! This is a separate terminal mode, not a step of the install script. It is
//! meant for debugging an install that got stuck: run the script up to some
//! point, then take over the console by hand.

use log::{error, info};

use crate::error::Result;
use crate::transport::Interact;

/// Status the process exits with after an interactive hand-off.
pub const INTERACTIVE_EXIT_CODE: i32 = 0;

/// Connect `console` to the local terminal until either side closes.
///
/// Reading the local terminal goes through `tokio::io::stdin`, whose read
/// blocks a runtime thread. If the guest side closes first that read is still
/// in flight and keeps the runtime from shutting down until the user presses
/// a key. Callers should exit the process once this returns, as
/// [`interact_and_exit`] does.
pub async fn hand_off<C: Interact>(console: C) -> Result<()> {
    info!("handing the console over, automatic output logging stops here");
    console.interact().await
}

/// Hand the console over, then exit the process with
/// [`INTERACTIVE_EXIT_CODE`] no matter how the session ended.
pub async fn interact_and_exit<C: Interact>(console: C) -> ! {
    if let Err(e) = hand_off(console).await {
        error!("interactive session failed: {}", e);
    }
    std::process::exit(INTERACTIVE_EXIT_CODE)
}
