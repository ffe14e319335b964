use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("seoscan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("seoscan")
        .about("Crawl a website and audit its pages for common technical SEO issues")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress spinners and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("audit")
                .about(
                    "Crawl one site (or every site in a hosts file) within its own origin and \
                report SEO findings.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required_unless_present("hosts-file")
                        .help("The site to audit")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of sites to audit")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to fetch per site")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .args(crawl_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, markdown, json")
                        .value_parser(["text", "markdown", "md", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("serve")
                .about("Run one of the HTTP agents")
                .arg(
                    arg!(-a --"agent" <AGENT>)
                        .required(false)
                        .help("Which agent to serve")
                        .value_parser(["audit", "orchestrator", "reporting"])
                        .default_value("audit"),
                )
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on")
                        .value_parser(clap::value_parser!(std::net::IpAddr))
                        .default_value("127.0.0.1"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on (default: 8001 audit, 8000 orchestrator, 8002 reporting)")
                        .value_parser(clap::value_parser!(u16)),
                )
                .args(crawl_args()),
        )
}

/// Crawl tuning flags shared by `audit` and `serve`.
fn crawl_args() -> [clap::Arg; 5] {
    [
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("10"),
        arg!(--"delay" <MILLISECONDS>)
            .required(false)
            .help("Pause between successful fetches")
            .value_parser(clap::value_parser!(u64))
            .default_value("100"),
        arg!(--"backoff")
            .required(false)
            .help("Back off exponentially after consecutive fetch failures")
            .action(clap::ArgAction::SetTrue),
        arg!(--"max-pending" <NUM>)
            .required(false)
            .help("Maximum number of discovered URLs waiting to be fetched")
            .value_parser(clap::value_parser!(usize))
            .default_value("10000"),
        arg!(--"deadline" <SECONDS>)
            .required(false)
            .help("Stop crawling a site after this many seconds")
            .value_parser(clap::value_parser!(u64)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_audit_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["seoscan", "audit", "-u", "https://example.com"])
            .unwrap();
        let (name, audit) = matches.subcommand().unwrap();

        assert_eq!(name, "audit");
        assert_eq!(audit.get_one::<usize>("max-pages"), Some(&10));
        assert_eq!(audit.get_one::<u64>("timeout"), Some(&10));
        assert_eq!(audit.get_one::<u64>("delay"), Some(&100));
        assert_eq!(audit.get_one::<String>("format").map(String::as_str), Some("text"));
        assert!(!audit.get_flag("backoff"));
        assert!(audit.get_one::<u64>("deadline").is_none());
    }

    #[test]
    fn test_audit_requires_a_target() {
        let result = command_argument_builder().try_get_matches_from(["seoscan", "audit"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_audit_url_conflicts_with_hosts_file() {
        let result = command_argument_builder().try_get_matches_from([
            "seoscan",
            "audit",
            "-u",
            "https://example.com",
            "-H",
            "hosts.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["seoscan", "serve"])
            .unwrap();
        let (_, serve) = matches.subcommand().unwrap();

        assert_eq!(serve.get_one::<String>("agent").map(String::as_str), Some("audit"));
        assert!(serve.get_one::<u16>("port").is_none());
    }

    #[test]
    fn test_serve_accepts_crawl_flags() {
        let matches = command_argument_builder()
            .try_get_matches_from([
                "seoscan", "serve", "--timeout", "3", "--delay", "0", "--backoff", "--deadline", "60",
            ])
            .unwrap();
        let (_, serve) = matches.subcommand().unwrap();
        let settings = seoscan::settings_from_args(serve);

        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.delay_ms, 0);
        assert!(settings.backoff_on_failure);
        assert_eq!(settings.deadline_secs, Some(60));
        assert_eq!(settings.max_pending, 10000);
        // serve has no --max-pages; each request names its own budget
        assert_eq!(settings.max_pages, seoscan_scanner::CrawlSettings::default().max_pages);
    }
}
