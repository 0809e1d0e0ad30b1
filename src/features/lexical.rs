//! String statistics and email domain lookup.

use crate::error::{FeatureError, Result};
use crate::reference::DisposableDomainSet;
use std::collections::HashMap;

/// Shannon entropy in bits over the character distribution. Empty input yields 0.0.
pub fn string_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            p * p.log2()
        })
        .sum();
    // -0.0 for single-symbol strings
    (-entropy).max(0.0)
}

/// Split an address at its first `@` into (local part, domain).
pub fn split_email(email: &str) -> Result<(&str, &str)> {
    match email.split_once('@') {
        Some((local, domain)) if !domain.trim().is_empty() => Ok((local, domain)),
        _ => Err(FeatureError::MalformedEmail {
            field: "email",
            value: email.to_string(),
        }),
    }
}

pub fn is_disposable_email(email: &str, domains: &DisposableDomainSet) -> Result<i8> {
    let (_, domain) = split_email(email)?;
    Ok(domains.contains(domain) as i8)
}
