//! Channel layer for console output matching and keystroke injection.
//!
//! This module handles the console session itself: accumulating guest
//! output, stripping terminal escapes, finding prompts, and writing input.

mod ansi;
mod buffer;
mod console;
mod echo;
mod patterns;

pub use ansi::AnsiStripper;
pub use buffer::PatternBuffer;
pub use console::{ChannelConfig, ConsoleChannel};
pub use echo::{CONSOLE_TARGET, ConsoleEcho};
pub use patterns::{Pattern, PromptMatcher};
