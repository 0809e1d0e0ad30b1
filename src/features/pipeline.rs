//! Feature assembly: raw record → lexical/temporal/behavioral derivations → feature row.

use super::behavioral::{self, TransactionTypeFlags};
use super::lexical::{self, string_entropy};
use super::temporal::{self, parse_optional_timestamp, parse_timestamp};
use super::TransactionFeatures;
use crate::config::{AgeReference, PipelineConfig};
use crate::error::{FeatureError, Result};
use crate::record::RawTransactionRecord;
use crate::reference::DisposableDomainSet;
use chrono::Utc;
use rayon::prelude::*;
use std::sync::Arc;

/// `emailEntropy` value the deployed models were trained with.
pub const EMAIL_ENTROPY_CONSTANT: f32 = 0.1;

/// Stateless apart from the shared read-only domain set; safe to share across threads.
pub struct FeatureExtractor {
    config: PipelineConfig,
    domains: Arc<DisposableDomainSet>,
}

impl FeatureExtractor {
    pub fn new(domains: Arc<DisposableDomainSet>, config: PipelineConfig) -> Self {
        Self { config, domains }
    }

    /// Load the domain set from `config.disposable_domains_path`.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let domains = DisposableDomainSet::load(&config.disposable_domains_path)?;
        Ok(Self::new(Arc::new(domains), config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn domains(&self) -> &DisposableDomainSet {
        &self.domains
    }

    /// Derive the full feature row for one record. The label is copied iff `include_label`.
    pub fn extract(
        &self,
        record: &RawTransactionRecord,
        include_label: bool,
    ) -> Result<TransactionFeatures> {
        record.validate()?;
        let heuristics = &self.config.heuristics;

        let created = parse_timestamp("accountCreationDate", &record.account_creation_date)?;
        let tx_time = parse_timestamp("currentTransactionDate", &record.current_transaction_date)?;
        let last_tx_time = parse_optional_timestamp(
            "lastTransactionDate",
            record.last_transaction_date.as_deref(),
        )?;

        let (local_part, _) = lexical::split_email(&record.email)?;
        let email_is_disposable = lexical::is_disposable_email(&record.email, &self.domains)?;
        let email_entropy = if heuristics.email_entropy_from_local_part {
            string_entropy(local_part) as f32
        } else {
            EMAIL_ENTROPY_CONSTANT
        };
        let is_dummy_email = if record.is_kyc_verified {
            0
        } else {
            behavioral::is_dummy_email(&record.email, &self.domains, heuristics)?
        };

        let age_reference = match self.config.temporal.account_new_reference {
            AgeReference::WallClock => Utc::now(),
            AgeReference::TransactionTime => tx_time,
        };
        let (day_sin, day_cos) = temporal::day_of_week_cyclic(tx_time);
        let (hour_sin, hour_cos) = temporal::hour_of_day_cyclic(tx_time);
        let type_flags = TransactionTypeFlags::encode(record.transaction_type);

        let recent = record.recent_amounts();
        if recent.is_empty() {
            tracing::debug!("empty amount history; relative amount defaults to 0");
        }

        let is_fraud = if include_label {
            let label = record.is_fraud.ok_or(FeatureError::MissingField("isFraud"))?;
            Some(label as i8)
        } else {
            None
        };

        Ok(TransactionFeatures {
            email_entropy,
            email_is_disposable,
            user_account_name_entropy: string_entropy(record.user_account_name.trim()) as f32,
            is_dummy_name: behavioral::is_dummy_name(
                &record.user_account_name,
                heuristics.dummy_entropy_threshold,
            ),
            is_dummy_email,
            account_age_log_before_transaction: temporal::account_age_log_before_transaction(
                created, tx_time,
            ) as f32,
            account_is_new: temporal::account_is_new(created, age_reference),
            kyc_verified: record.is_kyc_verified as i8,
            ip_address_is_different_from_last_request_ip: behavioral::ip_matches_last_request(
                &record.last_request_ip_address,
                &record.current_request_ip_address,
            ),
            transaction_time_is_weekend: temporal::is_weekend(tx_time),
            transaction_time_is_sleeping_hours: temporal::is_sleeping_hours(tx_time),
            transaction_type_lightning_lnurl: type_flags.lightning_lnurl,
            transaction_type_lightning_invoice: type_flags.lightning_invoice,
            transaction_type_vas: type_flags.vas,
            transaction_type_onchain: type_flags.onchain,
            day_of_transaction_sin: day_sin as f32,
            day_of_transaction_cos: day_cos as f32,
            hour_of_transaction_sin: hour_sin as f32,
            hour_of_transaction_cos: hour_cos as f32,
            time_since_last_transaction_log: temporal::time_since_last_transaction_log(
                tx_time,
                last_tx_time,
            ) as f32,
            last_transaction_amount_is_the_same: behavioral::amount_is_repeated(
                record.current_transaction_amount,
                record.last_transaction_amount,
            ),
            transaction_amount_relative_to_median_log: behavioral::amount_relative_to_median_log(
                record.current_transaction_amount,
                &recent,
            )? as f32,
            number_of_transactions_in_last_24h: behavioral::transactions_in_last_24h(
                record.number_of_transactions_in_last_24h,
            )?,
            transaction_amount_log: behavioral::transaction_amount_log(
                record.current_transaction_amount,
            )? as f32,
            wallet_balance_is_sufficient: behavioral::wallet_balance_is_sufficient(
                record.wallet_balance,
                record.current_transaction_amount,
            ),
            is_fraud,
        })
    }

    /// Decode a JSON record and extract its features.
    pub fn extract_json(&self, data: &str, include_label: bool) -> Result<TransactionFeatures> {
        let record = RawTransactionRecord::from_json(data)?;
        self.extract(&record, include_label)
    }

    /// Extract every record, preserving order. The first failure aborts the batch.
    pub fn extract_batch(
        &self,
        records: &[RawTransactionRecord],
        include_label: bool,
    ) -> Result<Vec<TransactionFeatures>> {
        let run = |(index, record): (usize, &RawTransactionRecord)| {
            self.extract(record, include_label)
                .map_err(|e| FeatureError::Record {
                    index,
                    source: Box::new(e),
                })
        };
        let rows: Result<Vec<_>> = if self.config.batch.parallel {
            records.par_iter().enumerate().map(run).collect()
        } else {
            records.iter().enumerate().map(run).collect()
        };
        match &rows {
            Ok(r) => tracing::debug!(rows = r.len(), include_label, "batch extracted"),
            Err(e) => tracing::warn!(error = %e, "batch extraction failed"),
        }
        rows
    }
}

/// Alias for pipeline that runs: record → features
pub type FeaturePipeline = FeatureExtractor;
