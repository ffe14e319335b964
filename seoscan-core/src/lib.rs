pub mod audit;
pub mod checks;
pub mod model;
pub mod report;

pub use audit::{AuditError, AuditOptions, SiteAudit, audit_site, audit_with, parse_target};
pub use checks::{Check, CheckRunner};
pub use model::{AuditItem, AuditResult, Severity, SeverityCounts};
pub use report::{ReportFormat, generate_report, save_report};
