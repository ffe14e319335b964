// Findings and audit results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single SEO issue found on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditItem {
    pub check_name: String,
    pub severity: Severity,
    pub description: String,
    pub found_url: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl AuditItem {
    pub fn new(
        check_name: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        found_url: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            severity,
            description: description.into(),
            found_url: found_url.into(),
            recommendation: recommendation.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a AuditItem>) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.increment(item.severity);
        }
        counts
    }

    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.error + self.warning + self.info
    }
}

/// Every finding for one audited site. Built once by [`AuditResult::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub base_url: String,
    pub audit_timestamp: DateTime<Utc>,
    pub total_issues: usize,
    pub issues_by_severity: SeverityCounts,
    pub items: Vec<AuditItem>,
}

impl AuditResult {
    /// Tally `items` by severity and stamp them with `base_url` and the
    /// current time. Item order is preserved.
    pub fn aggregate(base_url: impl Into<String>, items: Vec<AuditItem>) -> Self {
        Self::aggregate_at(base_url, items, Utc::now())
    }

    pub fn aggregate_at(
        base_url: impl Into<String>,
        items: Vec<AuditItem>,
        audit_timestamp: DateTime<Utc>,
    ) -> Self {
        let issues_by_severity = SeverityCounts::tally(&items);
        Self {
            base_url: base_url.into(),
            audit_timestamp,
            total_issues: items.len(),
            issues_by_severity,
            items,
        }
    }

    pub fn items_with_severity(&self, severity: Severity) -> impl Iterator<Item = &AuditItem> {
        self.items.iter().filter(move |item| item.severity == severity)
    }

    pub fn is_clean(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(severity: Severity) -> AuditItem {
        AuditItem::new("Check", severity, "desc", "https://example.com/", "fix it")
    }

    #[test]
    fn test_severity_names_match_serialized_form() {
        for severity in Severity::ALL {
            let json = serde_json::to_value(severity).unwrap();
            assert_eq!(json, severity.as_str());
            assert_eq!(severity.to_string(), severity.as_str());
        }
    }

    #[test]
    fn test_aggregate_counts_are_consistent() {
        let items = vec![
            item(Severity::Error),
            item(Severity::Warning),
            item(Severity::Warning),
            item(Severity::Info),
        ];

        let result = AuditResult::aggregate("https://example.com", items);

        assert_eq!(result.total_issues, 4);
        assert_eq!(result.issues_by_severity.total(), result.total_issues);
        assert_eq!(result.items.len(), result.total_issues);
        assert_eq!(result.issues_by_severity.warning, 2);
        assert_eq!(result.issues_by_severity.critical, 0);
    }

    #[test]
    fn test_aggregate_empty() {
        let result = AuditResult::aggregate("https://example.com", Vec::new());
        assert!(result.is_clean());
        assert_eq!(result.issues_by_severity, SeverityCounts::default());
    }

    #[test]
    fn test_serialized_shape() {
        let result = AuditResult::aggregate("https://example.com", vec![item(Severity::Error)]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["base_url"], "https://example.com");
        assert_eq!(json["total_issues"], 1);
        assert_eq!(json["issues_by_severity"]["error"], 1);
        assert_eq!(json["issues_by_severity"]["critical"], 0);
        assert_eq!(json["items"][0]["severity"], "error");
        assert!(json["items"][0].get("context").is_none());
        assert!(json["audit_timestamp"].is_string());
    }
}
