//! Behavioral signals: identity heuristics, transaction type, amount history.

use super::lexical::{is_disposable_email, split_email, string_entropy};
use crate::config::HeuristicsConfig;
use crate::error::{FeatureError, Result};
use crate::record::TransactionType;
use crate::reference::DisposableDomainSet;

/// Disposable address, or a high-entropy local part.
pub fn is_dummy_email(
    email: &str,
    domains: &DisposableDomainSet,
    heuristics: &HeuristicsConfig,
) -> Result<i8> {
    let (local, _) = split_email(email)?;
    let entropy = string_entropy(local);
    let disposable = is_disposable_email(email, domains)? == 1;

    if disposable {
        return Ok(1);
    }
    if entropy > heuristics.dummy_entropy_threshold {
        return Ok(1);
    }
    // shadowed by the disposable check above
    if disposable && entropy > heuristics.disposable_entropy_threshold {
        return Ok(1);
    }
    Ok(0)
}

pub fn is_dummy_name(name: &str, threshold: f64) -> i8 {
    (string_entropy(name) > threshold) as i8
}

/// One-hot transaction type. Lightning invoice is the baseline and stays 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionTypeFlags {
    pub lightning_lnurl: i8,
    pub lightning_invoice: i8,
    pub vas: i8,
    pub onchain: i8,
}

impl TransactionTypeFlags {
    pub fn encode(transaction_type: TransactionType) -> Self {
        Self {
            lightning_lnurl: (transaction_type == TransactionType::LightningLnurl) as i8,
            lightning_invoice: 0,
            vas: (transaction_type == TransactionType::Vas) as i8,
            onchain: (transaction_type == TransactionType::Onchain) as i8,
        }
    }

    pub fn active_count(&self) -> u32 {
        [self.lightning_lnurl, self.lightning_invoice, self.vas, self.onchain]
            .iter()
            .map(|&f| f as u32)
            .sum()
    }
}

/// Median with the two middle values averaged on even length.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `ln(current / median(history))`; 0.0 when the history carries no positive median.
pub fn amount_relative_to_median_log(current: f64, history: &[f64]) -> Result<f64> {
    let median = match median(history) {
        Some(m) if m > 0.0 => m,
        _ => {
            tracing::trace!(entries = history.len(), "no positive median in amount history");
            return Ok(0.0);
        }
    };
    if current <= 0.0 || !current.is_finite() {
        return Err(FeatureError::NonPositiveAmount {
            field: "currentTransactionAmount",
            value: current,
        });
    }
    Ok((current / median).ln())
}

pub fn amount_is_repeated(current: f64, last: f64) -> i8 {
    (current == last) as i8
}

pub fn wallet_balance_is_sufficient(balance: f64, amount: f64) -> i8 {
    (balance > amount) as i8
}

/// 1 when the request comes from the same address as the previous one.
pub fn ip_matches_last_request(last: &str, current: &str) -> i8 {
    (last == current) as i8
}

pub fn transaction_amount_log(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FeatureError::InvalidAmount {
            field: "currentTransactionAmount",
            value: amount,
        });
    }
    Ok(amount.ln_1p())
}

pub fn transactions_in_last_24h(count: u32) -> Result<i8> {
    i8::try_from(count).map_err(|_| FeatureError::OutOfRange {
        field: "numberOfTransactionsInLast24h",
        value: count as i64,
        dtype: "int8",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> DisposableDomainSet {
        ["mailinator.com"].into_iter().collect()
    }

    #[test]
    fn dummy_email_on_disposable_domain() {
        let h = HeuristicsConfig::default();
        assert_eq!(is_dummy_email("bob@mailinator.com", &domains(), &h).unwrap(), 1);
        assert_eq!(is_dummy_email("bob@gmail.com", &domains(), &h).unwrap(), 0);
    }

    #[test]
    fn dummy_email_on_high_entropy_local_part() {
        let h = HeuristicsConfig::default();
        // 10 distinct characters: log2(10) > 3.1
        assert_eq!(is_dummy_email("x9fk2qbzt7@gmail.com", &domains(), &h).unwrap(), 1);
        // 8 distinct characters: log2(8) = 3.0
        assert_eq!(is_dummy_email("abcdefgh@gmail.com", &domains(), &h).unwrap(), 0);
    }

    #[test]
    fn dummy_email_requires_domain() {
        let h = HeuristicsConfig::default();
        assert!(is_dummy_email("nobody", &domains(), &h).is_err());
    }

    #[test]
    fn dummy_name_threshold() {
        assert_eq!(is_dummy_name("bob", 3.1), 0);
        assert_eq!(is_dummy_name("Xq9!fK2@bZ", 3.1), 1);
        assert_eq!(is_dummy_name("", 3.1), 0);
    }

    #[test]
    fn one_hot_has_at_most_one_flag() {
        for t in TransactionType::all() {
            let flags = TransactionTypeFlags::encode(*t);
            assert!(flags.active_count() <= 1);
            assert_eq!(flags.lightning_invoice, 0);
        }
        assert_eq!(
            TransactionTypeFlags::encode(TransactionType::LightningInvoice).active_count(),
            0
        );
        assert_eq!(TransactionTypeFlags::encode(TransactionType::Vas).vas, 1);
        assert_eq!(TransactionTypeFlags::encode(TransactionType::Onchain).onchain, 1);
        assert_eq!(
            TransactionTypeFlags::encode(TransactionType::LightningLnurl).lightning_lnurl,
            1
        );
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn relative_to_median() {
        assert_eq!(amount_relative_to_median_log(100.0, &[]).unwrap(), 0.0);
        assert_eq!(amount_relative_to_median_log(100.0, &[100.0, 100.0, 100.0]).unwrap(), 0.0);
        assert_eq!(amount_relative_to_median_log(100.0, &[0.0, 0.0, 5.0]).unwrap(), 0.0);
        let v = amount_relative_to_median_log(200.0, &[50.0, 100.0, 150.0]).unwrap();
        assert!((v - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn relative_to_median_rejects_non_positive_amount() {
        assert!(matches!(
            amount_relative_to_median_log(0.0, &[10.0]),
            Err(FeatureError::NonPositiveAmount { .. })
        ));
        assert!(matches!(
            amount_relative_to_median_log(-5.0, &[10.0]),
            Err(FeatureError::NonPositiveAmount { .. })
        ));
        assert!(matches!(
            amount_relative_to_median_log(f64::NAN, &[10.0]),
            Err(FeatureError::NonPositiveAmount { .. })
        ));
        // no median to compare with, so no log is taken
        assert_eq!(amount_relative_to_median_log(0.0, &[]).unwrap(), 0.0);
    }

    #[test]
    fn simple_flags() {
        assert_eq!(amount_is_repeated(100.0, 100.0), 1);
        assert_eq!(amount_is_repeated(100.0, 100.5), 0);
        assert_eq!(wallet_balance_is_sufficient(500.0, 100.0), 1);
        assert_eq!(wallet_balance_is_sufficient(100.0, 100.0), 0);
        assert_eq!(ip_matches_last_request("1.1.1.1", "1.1.1.1"), 1);
        assert_eq!(ip_matches_last_request("1.1.1.1", "8.8.8.8"), 0);
    }

    #[test]
    fn amount_log_and_count() {
        assert_eq!(transaction_amount_log(0.0).unwrap(), 0.0);
        assert!((transaction_amount_log(99.0).unwrap() - 100f64.ln()).abs() < 1e-12);
        assert!(transaction_amount_log(-1.0).is_err());
        assert_eq!(transactions_in_last_24h(127).unwrap(), 127);
        assert!(matches!(
            transactions_in_last_24h(128),
            Err(FeatureError::OutOfRange { .. })
        ));
    }
}
