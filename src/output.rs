use std::io::{self, Write};

use serde::Serialize;

use crate::harvest::{ProgressEvent, ProgressSink};
use crate::merge::ResultMapping;

#[derive(Debug, Clone, Copy, Default)]
pub enum JsonStyle {
    #[default]
    Pretty,
    Compact,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_results(mapping: &ResultMapping, style: JsonStyle) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        Self::write_json(&mut stdout, mapping, style)
    }

    pub fn write_json<W: Write, T: Serialize>(
        writer: &mut W,
        value: &T,
        style: JsonStyle,
    ) -> io::Result<()> {
        let json = match style {
            JsonStyle::Pretty => serde_json::to_string_pretty(value),
            JsonStyle::Compact => serde_json::to_string(value),
        }
        .map_err(io::Error::other)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// Forwards progress to the `tracing` subscriber.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => {
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message)
            }
            None => tracing::info!("{}", event.message),
        }
    }
}

/// Drops every event.
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn event(&self, _event: ProgressEvent) {}
}
