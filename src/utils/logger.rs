use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::redact_token;

/// Log file appended next to the host application.
pub const LOG_FILE: &str = "botloop.log";

/// A writer that strips bot tokens from every line before it reaches the
/// underlying sink. Last line of defense behind the per-message redaction in
/// the pipeline.
pub struct RedactingWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> RedactingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

impl<W> Clone for RedactingWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let redacted = redact_token(&text);
        let mut sink = self.inner.lock().expect("log writer poisoned");
        sink.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().expect("log writer poisoned").flush()
    }
}

impl<'a, W: Write + Send + 'static> MakeWriter<'a> for RedactingWriter<W> {
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global tracing subscriber: compact console output filtered by
/// `RUST_LOG` (default `info`) plus a redacted append-mode log file.
pub fn setup_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).compact())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(RedactingWriter::new(log_file)),
        )
        .with(env_filter)
        .init();

    Ok(())
}
