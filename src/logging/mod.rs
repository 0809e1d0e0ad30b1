//! Structured logging and ndjson row output.

mod format;

pub use format::StructuredLogger;
