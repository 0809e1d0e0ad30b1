//! Integration test: config load, domain file, record → features, schema enforcement, ndjson.

use fraud_features::{
    config::PipelineConfig,
    features::FeatureExtractor,
    logging::StructuredLogger,
    record::RawTransactionRecord,
    reference::DisposableDomainSet,
    schema::{ColumnType, FeatureFrame, FeatureSchema, LABEL_COLUMN},
    FeatureError, TransactionFeatures,
};
use std::path::Path;
use std::sync::Arc;

const SCENARIO: &str = r#"{
    "email": "a@mailinator.com",
    "userAccountName": "bob",
    "accountCreationDate": "2024-01-01T00:00:00Z",
    "isKycVerified": false,
    "currentTransactionDate": "2024-06-01T12:00:00Z",
    "transactionType": "onchain",
    "currentTransactionAmount": 100,
    "lastTransactionAmount": 100,
    "lastTransactionDate": "2024-05-30T12:00:00Z",
    "last5TransactionsAmount": [100, 100, 100],
    "walletBalance": 500,
    "numberOfTransactionsInLast24h": 1,
    "lastRequestIpAddress": "1.1.1.1",
    "currentRequestIpAddress": "1.1.1.1",
    "isFraud": true
}"#;

fn extractor_with_domain_file(dir: &Path) -> FeatureExtractor {
    let domains_path = dir.join("disposable-email-domains.json");
    std::fs::write(
        &domains_path,
        r#"{"disposable_email_domains": ["mailinator.com", "yopmail.com", "10minutemail.com"]}"#,
    )
    .unwrap();

    let config = PipelineConfig {
        disposable_domains_path: domains_path,
        ..PipelineConfig::default()
    };
    FeatureExtractor::from_config(config).unwrap()
}

#[test]
fn config_load_default() {
    let c = PipelineConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.heuristics.dummy_entropy_threshold, 3.1);
    assert!(c.log.json);
}

#[test]
fn config_file_drives_domain_path() {
    let dir = tempfile::tempdir().unwrap();
    let domains_path = dir.path().join("domains.json");
    std::fs::write(&domains_path, r#"["throwaway.email"]"#).unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "disposable_domains_path": domains_path }).to_string(),
    )
    .unwrap();

    let config = PipelineConfig::try_load(&config_path).unwrap();
    let extractor = FeatureExtractor::from_config(config).unwrap();
    assert!(extractor.domains().contains("Throwaway.Email"));
    assert_eq!(extractor.domains().len(), 1);
}

#[test]
fn missing_domain_file_is_reported() {
    let config = PipelineConfig {
        disposable_domains_path: "missing/domains.json".into(),
        ..PipelineConfig::default()
    };
    assert!(matches!(
        FeatureExtractor::from_config(config),
        Err(FeatureError::Io(_))
    ));
}

#[test]
fn end_to_end_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    let f = extractor.extract_json(SCENARIO, false).unwrap();

    assert_eq!(f.email_is_disposable, 1);
    assert_eq!(f.last_transaction_amount_is_the_same, 1);
    assert_eq!(f.transaction_type_onchain, 1);
    assert_eq!(f.transaction_type_vas, 0);
    assert_eq!(f.transaction_type_lightning_lnurl, 0);
    assert_eq!(f.transaction_type_lightning_invoice, 0);
    assert_eq!(f.transaction_amount_relative_to_median_log, 0.0);
    assert_eq!(f.wallet_balance_is_sufficient, 1);
    assert_eq!(f.is_dummy_email, 1);
    assert_eq!(f.is_dummy_name, 0);
    assert_eq!(f.ip_address_is_different_from_last_request_ip, 1);
    assert_eq!(f.account_is_new, 0);
    // 2024-06-01 is a Saturday
    assert_eq!(f.transaction_time_is_weekend, 1);
    assert_eq!(f.transaction_time_is_sleeping_hours, 0);
    assert!((f.time_since_last_transaction_log - 49f32.ln()).abs() < 1e-5);
    assert!((f.transaction_amount_log - 101f32.ln()).abs() < 1e-5);
    assert_eq!(f.email_entropy, 0.1);
    // "bob": p(b) = 2/3, p(o) = 1/3
    let bob = -(2.0f64 / 3.0 * (2.0f64 / 3.0).log2() + 1.0 / 3.0 * (1.0f64 / 3.0).log2());
    assert!((f.user_account_name_entropy as f64 - bob).abs() < 1e-6);
    assert_eq!(f.is_fraud, None);
}

#[test]
fn first_transaction_has_no_gap_signal() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    for (current, last) in [
        ("2024-06-01T12:00:00Z", "null"),
        ("1999-12-31T23:59:59Z", "\"\""),
        ("2030-01-01", "null"),
    ] {
        let data = SCENARIO
            .replace("\"2024-06-01T12:00:00Z\"", &format!("\"{}\"", current))
            .replace("\"2024-05-30T12:00:00Z\"", last);
        let f = extractor.extract_json(&data, false).unwrap();
        assert_eq!(f.time_since_last_transaction_log, 0.0);
    }
}

#[test]
fn training_rows_carry_label_and_enforce_types() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    let record = RawTransactionRecord::from_json(SCENARIO).unwrap();
    let records = vec![record.clone(), record];

    let rows = extractor.extract_batch(&records, true).unwrap();
    assert!(rows.iter().all(|r| r.is_fraud == Some(1)));

    let schema = FeatureSchema::transaction_features();
    let frame = schema.enforce(&FeatureFrame::from_features(&rows).unwrap()).unwrap();
    assert_eq!(frame.rows(), 2);
    assert_eq!(frame.column_names().len(), TransactionFeatures::FEATURE_COUNT + 1);
    for column in &schema.columns {
        let cast = frame.column(&column.name).unwrap();
        assert_eq!(cast.dtype(), Some(column.dtype), "{}", column.name);
    }
    assert_eq!(schema.enforce(&frame).unwrap(), frame);
}

#[test]
fn inference_rows_skip_label_column() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    let f = extractor.extract_json(SCENARIO, false).unwrap();

    let schema = FeatureSchema::transaction_features();
    let frame = schema.enforce(&FeatureFrame::single(&f)).unwrap();
    assert_eq!(frame.column_names().len(), TransactionFeatures::FEATURE_COUNT);
    assert!(frame.column(LABEL_COLUMN).is_none());
    assert_eq!(
        frame.column("transactionType_lightningInvoice").unwrap().dtype(),
        Some(ColumnType::Int8)
    );
    assert_eq!(f.to_vector().len(), TransactionFeatures::FEATURE_COUNT);
}

#[test]
fn mixed_label_batch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    let with = extractor.extract_json(SCENARIO, true).unwrap();
    let without = extractor.extract_json(SCENARIO, false).unwrap();
    assert!(FeatureFrame::from_features(&[with, without]).is_err());
}

#[test]
fn ndjson_rows_decode_back_to_features() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = extractor_with_domain_file(dir.path());
    let rows = vec![extractor.extract_json(SCENARIO, true).unwrap()];

    let mut out = Vec::new();
    StructuredLogger::emit_rows(&rows, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let line = text.lines().next().unwrap();
    assert!(line.contains("\"isFraud\":1"));
    let decoded: TransactionFeatures = serde_json::from_str(line).unwrap();
    assert_eq!(decoded, rows[0]);
}

#[test]
fn extractor_is_shareable_across_threads() {
    let domains: DisposableDomainSet = ["mailinator.com"].into_iter().collect();
    let extractor = Arc::new(FeatureExtractor::new(
        Arc::new(domains),
        PipelineConfig::default(),
    ));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ex = Arc::clone(&extractor);
            std::thread::spawn(move || ex.extract_json(SCENARIO, true).unwrap())
        })
        .collect();
    let rows: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(rows.windows(2).all(|w| w[0] == w[1]));
}
