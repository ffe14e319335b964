use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use seoscan_core::{
    AuditOptions, AuditResult, ReportFormat, Severity, SiteAudit, audit_site, generate_report,
    save_report,
};
use seoscan_scanner::{CancellationToken, CrawlSettings};
use seoscan_service::AgentKind;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

// Helper functions for the audit handler

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as an http(s) URL, adding http:// to bare hosts
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(line.to_string());
    }

    if !line.contains("://") {
        let with_scheme = format!("http://{}", line);
        if let Ok(url) = Url::parse(&with_scheme)
            && url.host_str().is_some()
        {
            return Some(with_scheme);
        }
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

/// Map the `audit` subcommand's flags onto crawl settings
pub fn settings_from_args(args: &ArgMatches) -> CrawlSettings {
    let defaults = CrawlSettings::default();

    CrawlSettings::default()
        .with_max_pages(
            args.try_get_one::<usize>("max-pages")
                .ok()
                .flatten()
                .copied()
                .unwrap_or(defaults.max_pages),
        )
        .with_timeout(*args.get_one::<u64>("timeout").unwrap_or(&defaults.timeout_secs))
        .with_delay_ms(*args.get_one::<u64>("delay").unwrap_or(&defaults.delay_ms))
        .with_backoff(args.get_flag("backoff"))
        .with_max_pending(*args.get_one::<usize>("max-pending").unwrap_or(&defaults.max_pending))
        .with_deadline(args.get_one::<u64>("deadline").copied())
}

/// Render one or more results as a single document.
///
/// Several JSON results become a JSON array; text and markdown reports are
/// concatenated.
pub fn render_reports(
    results: &[AuditResult],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match (format, results) {
        (ReportFormat::Json, [single]) => generate_report(single, format),
        (ReportFormat::Json, many) => serde_json::to_string_pretty(many),
        (_, many) => {
            let reports = many
                .iter()
                .map(|result| generate_report(result, format))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reports.join("\n"))
        }
    }
}

fn print_audit_line(audit: &SiteAudit) {
    let counts = &audit.result.issues_by_severity;
    let severity_line = Severity::ALL
        .iter()
        .map(|severity| {
            let text = format!("{} {}", counts.get(*severity), severity);
            match severity {
                Severity::Critical => text.red().bold().to_string(),
                Severity::Error => text.red().to_string(),
                Severity::Warning => text.yellow().to_string(),
                Severity::Info => text.blue().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{} {} {} pages, {} issues ({})",
        "✓".green().bold(),
        audit.result.base_url.bright_white(),
        audit.stats.pages_fetched,
        audit.result.total_issues,
        severity_line
    );
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with the pages fetched so far");
            child.cancel();
        }
    });
    token
}

pub async fn handle_audit(args: &ArgMatches) -> anyhow::Result<()> {
    let quiet = args.get_flag("quiet");
    let urls = load_urls_from_source(
        args.get_one::<Url>("url"),
        args.get_one::<PathBuf>("hosts-file"),
    )
    .map_err(anyhow::Error::msg)?;

    let settings = settings_from_args(args);
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    if !quiet {
        println!(
            "\n🔎 Auditing {} site(s), up to {} pages each\n",
            urls.len(),
            settings.max_pages
        );
    }

    let cancel = cancel_on_ctrl_c();
    let mut results = Vec::with_capacity(urls.len());
    for url in &urls {
        if cancel.is_cancelled() {
            break;
        }
        let options = AuditOptions::new(settings.clone())
            .with_progress(!quiet)
            .with_cancellation(cancel.clone());

        match audit_site(url, options).await {
            Ok(audit) => {
                if !quiet {
                    print_audit_line(&audit);
                }
                results.push(audit.result);
            }
            Err(e) => eprintln!("{} {}: {}", "✗".red().bold(), url, e),
        }
    }

    if results.is_empty() {
        bail!("No site could be audited");
    }

    let report = render_reports(&results, format).context("Failed to render report")?;

    if let Some(output) = args.get_one::<String>("output") {
        let path = PathBuf::from(shellexpand::tilde(output).as_ref());
        save_report(&report, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if !quiet {
            println!(
                "\n{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
    } else {
        println!();
        print!("{}", report);
    }

    Ok(())
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    let kind = args
        .get_one::<String>("agent")
        .and_then(|a| AgentKind::from_str(a))
        .unwrap_or(AgentKind::Audit);
    let bind = args
        .get_one::<IpAddr>("bind")
        .copied()
        .unwrap_or(IpAddr::from([127, 0, 0, 1]));
    let port = args
        .get_one::<u16>("port")
        .copied()
        .unwrap_or_else(|| kind.default_port());

    let addr = SocketAddr::new(bind, port);
    if !args.get_flag("quiet") {
        println!(
            "{} Starting {} on {}",
            "→".blue().bold(),
            kind.service_name().bright_white(),
            addr
        );
    }

    seoscan_service::serve(addr, kind, settings_from_args(args)).await
}
