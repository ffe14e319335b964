// On-page SEO checks run against every crawled page

use crate::model::{AuditItem, Severity};
use scraper::{Html, Selector};
use serde_json::json;
use std::sync::LazyLock;

pub const TITLE_MIN_CHARS: usize = 50;
pub const TITLE_MAX_CHARS: usize = 60;
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid check selector")
}

/// A single on-page rule.
///
/// Checks are pure: the same document and URL always produce the same
/// findings.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, document: &Html, url: &str) -> Vec<AuditItem>;
}

pub struct TitleCheck;

impl Check for TitleCheck {
    fn name(&self) -> &'static str {
        "title"
    }

    fn run(&self, document: &Html, url: &str) -> Vec<AuditItem> {
        let title = document
            .select(&TITLE)
            .next()
            .map(|element| element.text().collect::<String>());

        let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
            return vec![AuditItem::new(
                "Missing Title Tag",
                Severity::Error,
                "Page is missing a title tag",
                url,
                "Add a descriptive title tag between 50-60 characters",
            )];
        };

        let length = title.chars().count();
        if length > TITLE_MAX_CHARS {
            vec![
                AuditItem::new(
                    "Title Too Long",
                    Severity::Warning,
                    format!("Title tag is {} characters (recommended: 50-60)", length),
                    url,
                    "Shorten the title tag to under 60 characters",
                )
                .with_context(json!({ "length": length, "title": title })),
            ]
        } else if length < TITLE_MIN_CHARS {
            vec![
                AuditItem::new(
                    "Title Too Short",
                    Severity::Info,
                    format!("Title tag is {} characters (recommended: 50-60)", length),
                    url,
                    "Consider making the title more descriptive",
                )
                .with_context(json!({ "length": length, "title": title })),
            ]
        } else {
            Vec::new()
        }
    }
}

pub struct MetaDescriptionCheck;

impl Check for MetaDescriptionCheck {
    fn name(&self) -> &'static str {
        "meta_description"
    }

    fn run(&self, document: &Html, url: &str) -> Vec<AuditItem> {
        let content = document
            .select(&META_DESCRIPTION)
            .next()
            .map(|element| element.value().attr("content").unwrap_or_default());

        match content {
            Some(content) if !content.trim().is_empty() => {
                let length = content.chars().count();
                if length > META_DESCRIPTION_MAX_CHARS {
                    vec![
                        AuditItem::new(
                            "Meta Description Too Long",
                            Severity::Warning,
                            format!(
                                "Meta description is {} characters (recommended: 150-160)",
                                length
                            ),
                            url,
                            "Shorten the meta description to under 160 characters",
                        )
                        .with_context(json!({ "length": length })),
                    ]
                } else {
                    Vec::new()
                }
            }
            _ => vec![AuditItem::new(
                "Missing Meta Description",
                Severity::Warning,
                "Page is missing a meta description",
                url,
                "Add a compelling meta description between 150-160 characters",
            )],
        }
    }
}

pub struct HeadingCheck;

impl Check for HeadingCheck {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn run(&self, document: &Html, url: &str) -> Vec<AuditItem> {
        let h1_count = document.select(&H1).count();

        match h1_count {
            0 => vec![AuditItem::new(
                "Missing H1 Heading",
                Severity::Error,
                "Page is missing an H1 heading",
                url,
                "Add a single H1 heading that describes the page content",
            )],
            1 => Vec::new(),
            n => vec![
                AuditItem::new(
                    "Multiple H1 Headings",
                    Severity::Warning,
                    format!("Page has {} H1 headings (recommended: 1)", n),
                    url,
                    "Use only one H1 heading per page for better SEO",
                )
                .with_context(json!({ "h1_count": n })),
            ],
        }
    }
}

/// Reports at most one finding per page, however many images lack alt text.
pub struct ImageAltCheck;

impl Check for ImageAltCheck {
    fn name(&self) -> &'static str {
        "images"
    }

    fn run(&self, document: &Html, url: &str) -> Vec<AuditItem> {
        let missing: Vec<&str> = document
            .select(&IMG)
            .filter(|img| img.value().attr("alt").is_none_or(str::is_empty))
            .map(|img| img.value().attr("src").unwrap_or_default())
            .collect();

        if missing.is_empty() {
            return Vec::new();
        }

        vec![
            AuditItem::new(
                "Missing Alt Text",
                Severity::Warning,
                "Image is missing alt text",
                url,
                "Add descriptive alt text to all images for accessibility and SEO",
            )
            .with_context(json!({ "images_missing_alt": missing.len(), "first_src": missing[0] })),
        ]
    }
}

/// Ordered set of checks applied to each page.
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    /// A runner with no checks registered.
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Parse `html` once and run every check against it, in registration
    /// order.
    pub fn run_all(&self, html: &str, url: &str) -> Vec<AuditItem> {
        let document = Html::parse_document(html);
        self.checks
            .iter()
            .flat_map(|check| check.run(&document, url))
            .collect()
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::empty()
            .with_check(TitleCheck)
            .with_check(MetaDescriptionCheck)
            .with_check(HeadingCheck)
            .with_check(ImageAltCheck)
    }
}
