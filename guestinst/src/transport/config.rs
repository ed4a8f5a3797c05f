//! Console process configuration.

use std::ffi::OsString;
use std::path::PathBuf;

/// How to start the process whose stdin/stdout is the guest console.
///
/// Typically a VM console attachment such as `virsh console <domain>`, or an
/// emulator started with its serial port on stdio.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Program to run.
    pub program: OsString,

    /// Arguments passed to the program.
    pub args: Vec<OsString>,

    /// Extra environment variables.
    pub envs: Vec<(OsString, OsString)>,

    /// Working directory, if different from ours.
    pub current_dir: Option<PathBuf>,
}

impl SpawnConfig {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    /// Program name for logs and errors.
    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}
