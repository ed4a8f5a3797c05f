//! Line-oriented echo of console output to the log.

use log::info;

/// Log target used for echoed console output.
pub const CONSOLE_TARGET: &str = "guestinst::console";

/// Assembles console output into lines and logs each completed line.
#[derive(Debug, Default)]
pub struct ConsoleEcho {
    partial: Vec<u8>,
    enabled: bool,
}

impl ConsoleEcho {
    pub fn new(enabled: bool) -> Self {
        Self {
            partial: Vec::new(),
            enabled,
        }
    }

    /// Feed output, returning the lines that were completed.
    pub fn feed(&mut self, data: &[u8]) -> Vec<String> {
        if !self.enabled {
            return Vec::new();
        }

        let mut lines = Vec::new();
        for &byte in data {
            if byte == b'\n' {
                lines.push(self.take_line());
            } else {
                self.partial.push(byte);
            }
        }

        for line in &lines {
            info!(target: CONSOLE_TARGET, "{}", line);
        }
        lines
    }

    /// Emit whatever is left of an unterminated line.
    pub fn flush(&mut self) -> Option<String> {
        if !self.enabled || self.partial.is_empty() {
            return None;
        }
        let line = self.take_line();
        info!(target: CONSOLE_TARGET, "{}", line);
        Some(line)
    }

    fn take_line(&mut self) -> String {
        let raw = std::mem::take(&mut self.partial);
        let line = String::from_utf8_lossy(&raw);
        line.trim_end_matches('\r').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_assembled_across_feeds() {
        let mut echo = ConsoleEcho::new(true);
        assert!(echo.feed(b"mount -rt cd9").is_empty());
        assert_eq!(echo.feed(b"660 /dev/cd1 /mnt\r\n# "), vec!["mount -rt cd9660 /dev/cd1 /mnt"]);
        assert_eq!(echo.flush().as_deref(), Some("# "));
        assert!(echo.flush().is_none());
    }

    #[test]
    fn test_disabled_echo_is_silent() {
        let mut echo = ConsoleEcho::new(false);
        assert!(echo.feed(b"lots of installer noise\n").is_empty());
        assert!(echo.flush().is_none());
    }
}
