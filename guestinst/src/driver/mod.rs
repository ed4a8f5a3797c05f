//! Install driver.
//!
//! The driver layer executes an install script against a console session:
//! it waits for each expected prompt, answers it, and finally reports how the
//! guest exited.

mod builder;
mod installer;
mod interactive;
mod response;
mod script;

pub use builder::InstallerBuilder;
pub use installer::InstallDriver;
pub use interactive::{INTERACTIVE_EXIT_CODE, hand_off, interact_and_exit};
pub use response::StepReport;
pub use script::{
    BOOT_COUNTDOWN, InstallScript, SHELL_QUESTION, SINGLE_USER_CHOICE, ScriptBuilder, Step,
};
