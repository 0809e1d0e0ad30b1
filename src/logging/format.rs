//! Log setup and JSON line output: one JSON object per line (ndjson).

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing and write feature rows as ndjson.
pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber: JSON or plain lines to stderr, level from RUST_LOG or default.
    ///
    /// Returns false when a subscriber was already installed.
    pub fn init(json: bool, default_level: &str) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .try_init()
                .is_ok()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .is_ok()
        }
    }

    /// Init from the `log` section of the pipeline config.
    pub fn init_from_config(config: &crate::config::LogConfig) -> bool {
        Self::init(config.json, &config.level)
    }

    /// Write one value as a single JSON line.
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }

    /// Write each value on its own line; returns the number of lines written.
    pub fn emit_rows<'a, T: Serialize + 'a>(
        rows: impl IntoIterator<Item = &'a T>,
        w: &mut impl Write,
    ) -> std::io::Result<usize> {
        let mut n = 0;
        for row in rows {
            Self::emit_json(row, w)?;
            n += 1;
        }
        Ok(n)
    }
}
