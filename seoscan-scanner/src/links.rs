use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href], area[href]").expect("valid link selector"));

/// Extract same-origin links from `html`, resolved against `page_url`.
///
/// Links come back in document order. Duplicates are kept; the frontier
/// deduplicates them.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for element in document.select(&LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute_url) = resolve_url(page_url, href) else {
            debug!("Unresolvable link {:?} on {}", href, page_url);
            continue;
        };

        if is_same_origin(&absolute_url, page_url) {
            links.push(absolute_url.to_string());
        } else {
            debug!("Skipping cross-origin link {}", absolute_url);
        }
    }

    links
}

/// Resolve `href` relative to `base`, dropping any fragment.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// Scheme, host and port match.
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_keeps_only_same_origin_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/page1">Page 1</a>
                <a href="https://external.com">External</a>
                <a href="/page2">Page 2</a>
                <a href="http://example.com/insecure">Other scheme</a>
                <a href="https://example.com:8443/port">Other port</a>
                <a href="https://example.com/page3">Absolute</a>
            </body></html>
        "#;

        let links = extract_links(html, &base());
        assert_eq!(
            links,
            vec![
                "https://example.com/page1",
                "https://example.com/page2",
                "https://example.com/page3",
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let html = r#"<a href="/a">A</a><a href="/a">A again</a>"#;
        let links = extract_links(html, &base());
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/a"]);
    }

    #[test]
    fn test_relative_links_resolve_against_page() {
        let page = Url::parse("https://example.com/docs/intro").unwrap();
        let html = r#"<a href="guide">Guide</a><a href="../about">About</a>"#;
        let links = extract_links(html, &page);
        assert_eq!(
            links,
            vec!["https://example.com/docs/guide", "https://example.com/about"]
        );
    }

    #[test]
    fn test_area_elements_are_hyperlinks() {
        let html = r#"<map><area href="/region" alt="r"></map>"#;
        let links = extract_links(html, &base());
        assert_eq!(links, vec!["https://example.com/region"]);
    }

    #[test]
    fn test_non_http_schemes_are_dropped() {
        let html = r#"
            <a href="mailto:someone@example.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="tel:+123">Call</a>
        "#;
        assert!(extract_links(html, &base()).is_empty());
    }

    #[test]
    fn test_fragment_is_stripped() {
        let html = r##"<a href="/page#section">Section</a><a href="#top">Top</a>"##;
        let links = extract_links(html, &base());
        assert_eq!(links, vec!["https://example.com/page", "https://example.com/"]);
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let html = r#"<a name="x">No href</a>"#;
        assert!(extract_links(html, &base()).is_empty());
    }

    #[test]
    fn test_garbage_markup_yields_no_links() {
        assert!(extract_links("<<<>>> not html at all <a", &base()).is_empty());
        assert!(extract_links("", &base()).is_empty());
    }

    #[test]
    fn test_is_same_origin() {
        let a = Url::parse("https://example.com/a").unwrap();
        let b = Url::parse("https://example.com:443/b?q=1").unwrap();
        let c = Url::parse("https://sub.example.com/").unwrap();
        assert!(is_same_origin(&a, &b));
        assert!(!is_same_origin(&a, &c));
    }
}
