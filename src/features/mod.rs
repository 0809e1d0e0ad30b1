//! Transaction feature derivation: lexical, temporal and behavioral signals
//! assembled into one fixed-schema row.

pub mod behavioral;
pub mod lexical;
mod pipeline;
pub mod temporal;

pub use behavioral::TransactionTypeFlags;
pub use pipeline::{FeatureExtractor, FeaturePipeline};

use serde::{Deserialize, Serialize};

/// Fixed-schema feature row for model input. Column names match the training dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFeatures {
    #[serde(rename = "emailEntropy")]
    pub email_entropy: f32,
    #[serde(rename = "emailIsDisposable")]
    pub email_is_disposable: i8,
    #[serde(rename = "userAccountNameEntropy")]
    pub user_account_name_entropy: f32,
    #[serde(rename = "isDummyName")]
    pub is_dummy_name: i8,
    #[serde(rename = "isDummyEmail")]
    pub is_dummy_email: i8,
    #[serde(rename = "accountAgeLogBeforeTransaction")]
    pub account_age_log_before_transaction: f32,
    #[serde(rename = "accountIsNew")]
    pub account_is_new: i8,
    #[serde(rename = "kycVerified")]
    pub kyc_verified: i8,
    /// 1 when the last and current request IPs are equal
    #[serde(rename = "ipAddressIsDifferentFromLastRequestIp")]
    pub ip_address_is_different_from_last_request_ip: i8,
    #[serde(rename = "transactionTimeIsWeekend")]
    pub transaction_time_is_weekend: i8,
    #[serde(rename = "transactionTimeIsSleepingHours")]
    pub transaction_time_is_sleeping_hours: i8,
    #[serde(rename = "transactionType_lightningLnurl")]
    pub transaction_type_lightning_lnurl: i8,
    /// Never set; lightning invoice is the one-hot baseline
    #[serde(rename = "transactionType_lightningInvoice", default)]
    pub transaction_type_lightning_invoice: i8,
    #[serde(rename = "transactionType_vas")]
    pub transaction_type_vas: i8,
    #[serde(rename = "transactionType_onchain")]
    pub transaction_type_onchain: i8,
    #[serde(rename = "dayOfTransactionSin")]
    pub day_of_transaction_sin: f32,
    #[serde(rename = "dayOfTransactionCos")]
    pub day_of_transaction_cos: f32,
    #[serde(rename = "hourOfTransactionSin")]
    pub hour_of_transaction_sin: f32,
    #[serde(rename = "hourOfTransactionCos")]
    pub hour_of_transaction_cos: f32,
    #[serde(rename = "timeSinceLastTransactionLog")]
    pub time_since_last_transaction_log: f32,
    #[serde(rename = "lastTransactionAmountIsTheSame")]
    pub last_transaction_amount_is_the_same: i8,
    #[serde(rename = "transactionAmountRelativeToMedianLog")]
    pub transaction_amount_relative_to_median_log: f32,
    #[serde(rename = "numberOfTransactionsInLast24h")]
    pub number_of_transactions_in_last_24h: i8,
    #[serde(rename = "transactionAmountLog")]
    pub transaction_amount_log: f32,
    #[serde(rename = "walletBalanceIsSufficient")]
    pub wallet_balance_is_sufficient: i8,
    /// Training label; omitted for inference rows
    #[serde(rename = "isFraud", default, skip_serializing_if = "Option::is_none")]
    pub is_fraud: Option<i8>,
}

impl TransactionFeatures {
    /// Number of columns excluding the label.
    pub const FEATURE_COUNT: usize = 25;

    /// (column name, value) in schema order; the label comes last when present.
    pub fn column_values(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![
            ("emailEntropy", self.email_entropy as f64),
            ("emailIsDisposable", self.email_is_disposable as f64),
            ("userAccountNameEntropy", self.user_account_name_entropy as f64),
            ("isDummyName", self.is_dummy_name as f64),
            ("isDummyEmail", self.is_dummy_email as f64),
            (
                "accountAgeLogBeforeTransaction",
                self.account_age_log_before_transaction as f64,
            ),
            ("accountIsNew", self.account_is_new as f64),
            ("kycVerified", self.kyc_verified as f64),
            (
                "ipAddressIsDifferentFromLastRequestIp",
                self.ip_address_is_different_from_last_request_ip as f64,
            ),
            ("transactionTimeIsWeekend", self.transaction_time_is_weekend as f64),
            (
                "transactionTimeIsSleepingHours",
                self.transaction_time_is_sleeping_hours as f64,
            ),
            (
                "transactionType_lightningLnurl",
                self.transaction_type_lightning_lnurl as f64,
            ),
            (
                "transactionType_lightningInvoice",
                self.transaction_type_lightning_invoice as f64,
            ),
            ("transactionType_vas", self.transaction_type_vas as f64),
            ("transactionType_onchain", self.transaction_type_onchain as f64),
            ("dayOfTransactionSin", self.day_of_transaction_sin as f64),
            ("dayOfTransactionCos", self.day_of_transaction_cos as f64),
            ("hourOfTransactionSin", self.hour_of_transaction_sin as f64),
            ("hourOfTransactionCos", self.hour_of_transaction_cos as f64),
            (
                "timeSinceLastTransactionLog",
                self.time_since_last_transaction_log as f64,
            ),
            (
                "lastTransactionAmountIsTheSame",
                self.last_transaction_amount_is_the_same as f64,
            ),
            (
                "transactionAmountRelativeToMedianLog",
                self.transaction_amount_relative_to_median_log as f64,
            ),
            (
                "numberOfTransactionsInLast24h",
                self.number_of_transactions_in_last_24h as f64,
            ),
            ("transactionAmountLog", self.transaction_amount_log as f64),
            ("walletBalanceIsSufficient", self.wallet_balance_is_sufficient as f64),
        ];
        if let Some(label) = self.is_fraud {
            out.push(("isFraud", label as f64));
        }
        out
    }

    /// Feature values as a model input vector (label excluded).
    pub fn to_vector(&self) -> Vec<f32> {
        self.column_values()
            .into_iter()
            .take(Self::FEATURE_COUNT)
            .map(|(_, v)| v as f32)
            .collect()
    }
}
