//! Fraud Features — transaction feature derivation for fraud scoring.
//!
//! Modular structure:
//! - [`record`] — Raw transaction record and transaction types
//! - [`reference`] — Disposable email domain reference set
//! - [`features`] — Lexical, temporal and behavioral derivations and the assembler
//! - [`schema`] — Declared column types and batch type enforcement
//! - [`logging`] — Structured logging and ndjson row output

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod record;
pub mod reference;
pub mod schema;

pub use config::PipelineConfig;
pub use error::{FeatureError, Result, SchemaError};
pub use features::{FeatureExtractor, TransactionFeatures};
pub use logging::StructuredLogger;
pub use record::{RawTransactionRecord, TransactionType};
pub use reference::DisposableDomainSet;
pub use schema::{ColumnType, FeatureFrame, FeatureSchema};
