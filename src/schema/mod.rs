//! Declared column types for the feature row and enforcement over batches.

mod frame;

pub use frame::{Column, FeatureFrame};

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const FEATURE_SCHEMA_VERSION: u32 = 1;

pub const LABEL_COLUMN: &str = "isFraud";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int8,
    Float32,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int8 => "int8",
            ColumnType::Float32 => "float32",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub dtype: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<FeatureColumn>,
}

const TRANSACTION_FEATURE_COLUMNS: &[(&str, ColumnType)] = &[
    ("emailEntropy", ColumnType::Float32),
    ("emailIsDisposable", ColumnType::Int8),
    ("userAccountNameEntropy", ColumnType::Float32),
    ("isDummyName", ColumnType::Int8),
    ("isDummyEmail", ColumnType::Int8),
    ("accountAgeLogBeforeTransaction", ColumnType::Float32),
    ("accountIsNew", ColumnType::Int8),
    ("kycVerified", ColumnType::Int8),
    ("ipAddressIsDifferentFromLastRequestIp", ColumnType::Int8),
    ("transactionTimeIsWeekend", ColumnType::Int8),
    ("transactionTimeIsSleepingHours", ColumnType::Int8),
    ("transactionType_lightningLnurl", ColumnType::Int8),
    ("transactionType_lightningInvoice", ColumnType::Int8),
    ("transactionType_vas", ColumnType::Int8),
    ("transactionType_onchain", ColumnType::Int8),
    ("dayOfTransactionSin", ColumnType::Float32),
    ("dayOfTransactionCos", ColumnType::Float32),
    ("hourOfTransactionSin", ColumnType::Float32),
    ("hourOfTransactionCos", ColumnType::Float32),
    ("timeSinceLastTransactionLog", ColumnType::Float32),
    ("lastTransactionAmountIsTheSame", ColumnType::Int8),
    ("transactionAmountRelativeToMedianLog", ColumnType::Float32),
    ("numberOfTransactionsInLast24h", ColumnType::Int8),
    ("transactionAmountLog", ColumnType::Float32),
    ("walletBalanceIsSufficient", ColumnType::Int8),
    (LABEL_COLUMN, ColumnType::Int8),
];

impl FeatureSchema {
    /// Schema of [`crate::TransactionFeatures`], label last.
    pub fn transaction_features() -> Self {
        Self {
            version: FEATURE_SCHEMA_VERSION,
            columns: TRANSACTION_FEATURE_COLUMNS
                .iter()
                .map(|(name, dtype)| FeatureColumn {
                    name: name.to_string(),
                    dtype: *dtype,
                })
                .collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Hex SHA-256 over version and `name:dtype` pairs; changes whenever the layout does.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("version:{};", self.version));
        hasher.update("columns:");
        for column in &self.columns {
            hasher.update(column.name.as_bytes());
            hasher.update(format!(":{};", column.dtype.as_str()));
        }
        hex::encode(hasher.finalize())
    }

    /// Cast every schema column present in `frame` to its declared type.
    ///
    /// Schema columns missing from the frame (e.g. the label during inference) are
    /// skipped, and columns outside the schema pass through untouched. Any cell that
    /// fails to cast fails the whole batch.
    pub fn enforce(&self, frame: &FeatureFrame) -> Result<FeatureFrame, SchemaError> {
        let mut columns = Vec::with_capacity(frame.columns().len());
        for (name, column) in frame.columns() {
            let cast = match self.column(name) {
                Some(def) => column.cast(name, def.dtype)?,
                None => column.clone(),
            };
            columns.push((name.clone(), cast));
        }
        tracing::trace!(rows = frame.rows(), columns = columns.len(), "schema enforced");
        Ok(FeatureFrame::from_parts(frame.rows(), columns))
    }
}
