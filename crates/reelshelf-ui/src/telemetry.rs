//! Console logging for the browser build.
//!
//! # Design
//! - Reuse the `tracing_subscriber` fmt layer for formatting and route each
//!   finished line to the console method matching its level.
//! - Lines are buffered per event and flushed when the writer drops.
//! - Timestamps are disabled: the wasm target has no system clock and the
//!   console already stamps entries.

use std::io::{self, Write};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Install the console subscriber at `level`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: Level) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(
            fmt::layer()
                .with_writer(ConsoleMakeWriter)
                .with_ansi(false)
                .without_time()
                .with_target(false),
        )
        .try_init()
}

/// Console method a line is written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleSink {
    /// `console.error`.
    Error,
    /// `console.warn`.
    Warn,
    /// `console.info`.
    Info,
    /// `console.debug`.
    Debug,
}

impl ConsoleSink {
    /// Sink for events at `level`.
    #[must_use]
    pub fn for_level(level: Level) -> Self {
        if level == Level::ERROR {
            Self::Error
        } else if level == Level::WARN {
            Self::Warn
        } else if level == Level::INFO {
            Self::Info
        } else {
            Self::Debug
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn emit(self, line: &str) {
        use gloo::console;
        match self {
            Self::Error => console::error!(line),
            Self::Warn => console::warn!(line),
            Self::Info => console::info!(line),
            Self::Debug => console::debug!(line),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn emit(self, line: &str) {
        let _ = writeln!(io::stderr(), "{line}");
    }
}

/// `tracing_subscriber` writer factory targeting the browser console.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleSink::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleSink::for_level(*meta.level()))
    }
}

/// Buffers one formatted event and hands complete lines to the console.
pub struct ConsoleWriter {
    sink: ConsoleSink,
    buffer: LineBuffer,
}

impl ConsoleWriter {
    const fn new(sink: ConsoleSink) -> Self {
        Self {
            sink,
            buffer: LineBuffer::new(),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in self.buffer.push(buf) {
            self.sink.emit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.buffer.finish() {
            self.sink.emit(&line);
        }
    }
}

#[derive(Default)]
struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = trim_line(&String::from_utf8_lossy(&line));
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = trim_line(&String::from_utf8_lossy(&self.buffer));
        self.buffer.clear();
        (!line.is_empty()).then_some(line)
    }
}

fn trim_line(line: &str) -> String {
    line.trim_end_matches(['\r', '\n']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_follows_level() {
        assert_eq!(ConsoleSink::for_level(Level::ERROR), ConsoleSink::Error);
        assert_eq!(ConsoleSink::for_level(Level::WARN), ConsoleSink::Warn);
        assert_eq!(ConsoleSink::for_level(Level::INFO), ConsoleSink::Info);
        assert_eq!(ConsoleSink::for_level(Level::TRACE), ConsoleSink::Debug);
    }

    #[test]
    fn line_buffer_splits_complete_lines() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"partial").is_empty());
        assert_eq!(buffer.push(b" line\r\nnext\n"), vec!["partial line", "next"]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn line_buffer_flushes_tail_on_finish() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"\n\ntail");
        assert_eq!(buffer.finish().as_deref(), Some("tail"));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn writer_accepts_whole_buffer() {
        let mut writer = ConsoleWriter::new(ConsoleSink::Debug);
        assert_eq!(writer.write(b"hello\n").unwrap(), 6);
        assert!(writer.flush().is_ok());
    }
}
