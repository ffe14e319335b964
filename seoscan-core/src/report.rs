// Report generation from audit results

use crate::model::{AuditResult, Severity};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

/// Render `result` in the requested format
pub fn generate_report(result: &AuditResult, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(result)),
        ReportFormat::Markdown => Ok(generate_markdown_report(result)),
        ReportFormat::Json => generate_json_report(result),
    }
}

/// Finding counts per check name, in order of first appearance
pub fn check_tally(result: &AuditResult) -> Vec<(String, usize)> {
    let mut tally: Vec<(String, usize)> = Vec::new();
    for item in &result.items {
        match tally.iter_mut().find(|(name, _)| *name == item.check_name) {
            Some((_, count)) => *count += 1,
            None => tally.push((item.check_name.clone(), 1)),
        }
    }
    tally
}

pub fn generate_text_report(result: &AuditResult) -> String {
    let mut report = String::new();

    report.push_str("SEO AUDIT SUMMARY\n");
    report.push_str("─────────────────\n");
    report.push_str(&format!("Site:         {}\n", result.base_url));
    report.push_str(&format!(
        "Audited:      {}\n",
        result.audit_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Total Issues: {}\n\n", result.total_issues));

    for severity in Severity::ALL {
        report.push_str(&format!(
            "  [{:<8}] {}\n",
            severity.as_str().to_uppercase(),
            result.issues_by_severity.get(severity)
        ));
    }

    let tally = check_tally(result);
    if !tally.is_empty() {
        report.push_str("\nBy check:\n");
        for (name, count) in tally {
            report.push_str(&format!("  {:<28} {}\n", name, count));
        }
    }

    report
}

pub fn generate_markdown_report(result: &AuditResult) -> String {
    let mut report = String::new();

    report.push_str(&format!("# SEO Audit: {}\n\n", result.base_url));
    report.push_str(&format!(
        "_Audited {}_\n\n",
        result.audit_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("**Total issues:** {}\n\n", result.total_issues));

    report.push_str("| Severity | Count |\n");
    report.push_str("|----------|-------|\n");
    for severity in Severity::ALL {
        report.push_str(&format!(
            "| {} | {} |\n",
            severity,
            result.issues_by_severity.get(severity)
        ));
    }

    let tally = check_tally(result);
    if !tally.is_empty() {
        report.push_str("\n## Issues by check\n\n");
        for (name, count) in tally {
            report.push_str(&format!("- {}: {}\n", name, count));
        }
    }

    report
}

pub fn generate_json_report(result: &AuditResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuditItem;

    fn sample() -> AuditResult {
        let url = "https://example.com/";
        AuditResult::aggregate(
            "https://example.com",
            vec![
                AuditItem::new("Missing Title Tag", Severity::Error, "d", url, "r"),
                AuditItem::new("Missing Alt Text", Severity::Warning, "d", url, "r"),
                AuditItem::new("Missing Title Tag", Severity::Error, "d", "https://example.com/a", "r"),
            ],
        )
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("MD"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("html"), None);
    }

    #[test]
    fn test_check_tally_first_seen_order() {
        let tally = check_tally(&sample());
        assert_eq!(
            tally,
            vec![
                ("Missing Title Tag".to_string(), 2),
                ("Missing Alt Text".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_text_report_lists_counts() {
        let text = generate_text_report(&sample());
        assert!(text.contains("Site:         https://example.com"));
        assert!(text.contains("Total Issues: 3"));
        assert!(text.contains("[ERROR   ] 2"));
        assert!(text.contains("[CRITICAL] 0"));
    }

    #[test]
    fn test_markdown_report_table() {
        let md = generate_markdown_report(&sample());
        assert!(md.starts_with("# SEO Audit: https://example.com"));
        assert!(md.contains("| warning | 1 |"));
        assert!(md.contains("- Missing Title Tag: 2"));
    }

    #[test]
    fn test_clean_result_has_no_check_section() {
        let clean = AuditResult::aggregate("https://example.com", Vec::new());
        assert!(!generate_markdown_report(&clean).contains("Issues by check"));
        assert!(!generate_text_report(&clean).contains("By check"));
    }
}
