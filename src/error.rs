//! Error types for record validation, feature derivation and schema casting.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("malformed email in field '{field}': {value:?}")]
    MalformedEmail { field: &'static str, value: String },
    #[error("invalid timestamp in field '{field}': {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("field '{field}' must be positive for a log ratio, got {value}")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("invalid amount in field '{field}': {value}")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("field '{field}' value {value} does not fit {dtype}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        dtype: &'static str,
    },
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field 'last5TransactionsAmount' holds {0} entries, at most 5 allowed")]
    TooManyRecentAmounts(usize),
    #[error("failed to decode transaction record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid disposable domain data: {0}")]
    DomainSet(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<FeatureError>,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("cannot cast column '{column}' row {row} value {value} to {dtype}")]
    Cast {
        column: String,
        row: usize,
        value: String,
        dtype: &'static str,
    },
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("label column present in {with_label} of {rows} rows")]
    LabelMismatch { with_label: usize, rows: usize },
}
