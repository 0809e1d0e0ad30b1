//! Disposable email domain reference set, loaded once and shared read-only.

use crate::error::{FeatureError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Accepted file layouts: the dataset's keyed object, or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum DomainFile {
    Keyed { disposable_email_domains: Vec<String> },
    List(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct DisposableDomainSet {
    domains: HashSet<String>,
}

impl DisposableDomainSet {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&data)
            .map_err(|e| FeatureError::DomainSet(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), domains = set.len(), "loaded disposable domains");
        Ok(set)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let file: DomainFile =
            serde_json::from_str(data).map_err(|e| FeatureError::DomainSet(e.to_string()))?;
        let domains = match file {
            DomainFile::Keyed {
                disposable_email_domains,
            } => disposable_email_domains,
            DomainFile::List(list) => list,
        };
        Ok(domains.into_iter().collect())
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(&domain.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for DisposableDomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let domains = iter
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_and_list_layouts() {
        let keyed = DisposableDomainSet::from_json_str(
            r#"{"disposable_email_domains": ["Mailinator.com", "tempmail.io"]}"#,
        )
        .unwrap();
        let list = DisposableDomainSet::from_json_str(r#"["mailinator.com", "tempmail.io"]"#).unwrap();
        assert_eq!(keyed.len(), 2);
        assert_eq!(list.len(), 2);
        assert!(keyed.contains("mailinator.com"));
        assert!(list.contains("TEMPMAIL.IO"));
    }

    #[test]
    fn lookup_does_not_trim() {
        let set: DisposableDomainSet = [" Mailinator.com "].into_iter().collect();
        assert!(set.contains("MAILINATOR.COM"));
        assert!(!set.contains(" mailinator.com "));
        assert!(!set.contains("mailinator.com\n"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(
            DisposableDomainSet::from_json_str(r#"{"domains": 3}"#),
            Err(FeatureError::DomainSet(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            DisposableDomainSet::load(Path::new("no-such-domains.json")),
            Err(FeatureError::Io(_))
        ));
    }
}
