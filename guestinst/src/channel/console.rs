//! Bidirectional console channel with pattern-based reads.

use std::time::Duration;

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::ansi::AnsiStripper;
use super::buffer::PatternBuffer;
use super::echo::ConsoleEcho;
use super::patterns::Pattern;
use crate::config::InstallConfig;
use crate::error::{ChannelError, Result};

const READ_CHUNK: usize = 4096;

/// Configuration for console channel behavior.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Unmatched bytes retained for matching.
    pub search_depth: usize,

    /// Strip terminal escape sequences before matching.
    pub strip_ansi: bool,

    /// Echo console output to the log.
    pub echo: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            search_depth: 4096,
            strip_ansi: true,
            echo: true,
        }
    }
}

impl From<&InstallConfig> for ChannelConfig {
    fn from(config: &InstallConfig) -> Self {
        Self {
            search_depth: config.search_depth,
            strip_ansi: config.strip_ansi,
            echo: !config.filter_output,
        }
    }
}

/// A console session over any reader/writer pair.
///
/// The reader carries guest output, the writer carries keystrokes. Output is
/// only read while a pattern is being waited for.
pub struct ConsoleChannel<R, W> {
    reader: R,
    writer: W,
    buffer: PatternBuffer,
    stripper: Option<AnsiStripper>,
    echo: ConsoleEcho,
    eof: bool,
}

impl<R, W> ConsoleChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a new channel with the given configuration.
    pub fn new(reader: R, writer: W, config: ChannelConfig) -> Self {
        Self {
            reader,
            writer,
            buffer: PatternBuffer::new(config.search_depth),
            stripper: config.strip_ansi.then(AnsiStripper::new),
            echo: ConsoleEcho::new(config.echo),
            eof: false,
        }
    }

    /// Wait until `pattern` appears in the console output.
    ///
    /// With `timeout` set to `None` this waits for as long as it takes. Returns
    /// the output that preceded the match.
    pub async fn expect(&mut self, pattern: &Pattern, timeout: Option<Duration>) -> Result<Vec<u8>> {
        match timeout {
            None => self.read_until(pattern).await,
            Some(limit) => tokio::time::timeout(limit, self.read_until(pattern))
                .await
                .map_err(|_| ChannelError::PatternTimeout {
                    pattern: pattern.as_str().to_string(),
                    timeout: limit,
                })?,
        }
    }

    async fn read_until(&mut self, pattern: &Pattern) -> Result<Vec<u8>> {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            if let Some(before) = self.buffer.take_match(pattern) {
                debug!("matched {}", pattern);
                return Ok(before);
            }
            self.buffer.trim();

            if self.eof {
                return Err(ChannelError::SessionClosed {
                    pattern: pattern.as_str().to_string(),
                }
                .into());
            }

            let n = self.reader.read(&mut chunk).await.map_err(|source| {
                ChannelError::MatchFailure {
                    pattern: pattern.as_str().to_string(),
                    source,
                }
            })?;
            trace!("console read: {} bytes, window: {} bytes", n, self.buffer.len());

            if n == 0 {
                self.eof = true;
                self.echo.flush();
                continue;
            }
            self.ingest(&chunk[..n]);
        }
    }

    fn ingest(&mut self, data: &[u8]) {
        match self.stripper.as_mut() {
            Some(stripper) => {
                let cleaned = stripper.strip(data);
                self.echo.feed(&cleaned);
                self.buffer.extend(&cleaned);
            }
            None => {
                self.echo.feed(data);
                self.buffer.extend(data);
            }
        }
    }

    /// Send `text` one character at a time.
    ///
    /// Each character is written and flushed on its own, with no delay in
    /// between. Nothing is appended.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        debug!("send {:?}", text);
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let bytes = c.encode_utf8(&mut buf).as_bytes();
            self.writer.write_all(bytes).await.map_err(send_error)?;
            self.writer.flush().await.map_err(send_error)?;
        }
        Ok(())
    }

    /// Read and echo output until the guest closes the stream.
    pub async fn drain(&mut self) -> Result<()> {
        let mut chunk = vec![0u8; READ_CHUNK];
        while !self.eof {
            let n = self.reader.read(&mut chunk).await.map_err(|source| {
                ChannelError::MatchFailure {
                    pattern: "<end of stream>".to_string(),
                    source,
                }
            })?;
            if n == 0 {
                self.eof = true;
                self.echo.flush();
            } else {
                self.ingest(&chunk[..n]);
                self.buffer.trim();
            }
        }
        Ok(())
    }

    /// Whether the guest has closed its output stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Connect the session to a local terminal until either side closes.
    ///
    /// Output received since the last match is written to `output` first.
    /// Guest output is no longer echoed to the log.
    pub async fn splice<I, O>(mut self, mut input: I, mut output: O) -> Result<()>
    where
        I: AsyncRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        output
            .write_all(self.buffer.as_slice())
            .await
            .map_err(ChannelError::HandOff)?;
        output.flush().await.map_err(ChannelError::HandOff)?;

        let to_guest = tokio::io::copy(&mut input, &mut self.writer);
        let from_guest = tokio::io::copy(&mut self.reader, &mut output);

        let copied = tokio::select! {
            r = to_guest => r,
            r = from_guest => r,
        };
        let n = copied.map_err(ChannelError::HandOff)?;
        debug!("local session ended after {} bytes", n);
        Ok(())
    }
}

fn send_error(source: std::io::Error) -> ChannelError {
    if source.kind() == std::io::ErrorKind::BrokenPipe {
        ChannelError::SessionClosed {
            pattern: String::new(),
        }
    } else {
        ChannelError::SendFailed { source }
    }
}
