//! Raw transaction record as delivered by the ingestion layer.

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of recent amounts carried in a record.
pub const RECENT_AMOUNTS_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    LightningInvoice,
    LightningLnurl,
    Vas,
    Onchain,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::LightningInvoice => "lightning_invoice",
            TransactionType::LightningLnurl => "lightning_lnurl",
            TransactionType::Vas => "vas",
            TransactionType::Onchain => "onchain",
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[
            TransactionType::LightningInvoice,
            TransactionType::LightningLnurl,
            TransactionType::Vas,
            TransactionType::Onchain,
        ]
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TransactionType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown transaction type {:?}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionRecord {
    pub email: String,
    pub user_account_name: String,
    pub account_creation_date: String,
    pub is_kyc_verified: bool,
    pub last_request_ip_address: String,
    pub current_request_ip_address: String,
    pub current_transaction_date: String,
    pub transaction_type: TransactionType,
    pub current_transaction_amount: f64,
    /// Absent on an account's first transaction
    #[serde(default)]
    pub last_transaction_date: Option<String>,
    pub last_transaction_amount: f64,
    #[serde(rename = "numberOfTransactionsInLast24h")]
    pub number_of_transactions_in_last_24h: u32,
    #[serde(rename = "last5TransactionsAmount")]
    pub last_5_transactions_amount: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transaction_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_transaction_destination: Option<String>,
    pub wallet_balance: f64,
    /// Training label; only read when the caller asks for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fraud: Option<bool>,
}

impl RawTransactionRecord {
    /// Decode and validate a single JSON record.
    pub fn from_json(data: &str) -> Result<Self> {
        let record: RawTransactionRecord = serde_json::from_str(data)?;
        record.validate()?;
        Ok(record)
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.last_5_transactions_amount.len() > RECENT_AMOUNTS_LEN {
            return Err(FeatureError::TooManyRecentAmounts(
                self.last_5_transactions_amount.len(),
            ));
        }
        let amounts = [
            ("currentTransactionAmount", self.current_transaction_amount),
            ("lastTransactionAmount", self.last_transaction_amount),
            ("walletBalance", self.wallet_balance),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(FeatureError::InvalidAmount { field, value });
            }
        }
        for value in self.last_5_transactions_amount.iter().flatten() {
            if !value.is_finite() {
                return Err(FeatureError::InvalidAmount {
                    field: "last5TransactionsAmount",
                    value: *value,
                });
            }
        }
        Ok(())
    }

    /// Recent amounts with missing entries replaced by zero.
    pub fn recent_amounts(&self) -> Vec<f64> {
        self.last_5_transactions_amount
            .iter()
            .map(|a| a.unwrap_or(0.0))
            .collect()
    }
}
