//! HTML link discovery
//!
//! Pulls every `<a href>` out of a fetched page and resolves it against the
//! page's final URL.

use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all anchor links from an HTML document, in document order
///
/// Links are resolved against `base_url`, which must be the *final* URL of
/// the response the HTML came from. Hrefs that can never be crawled
/// (`mailto:`, fragment-only, ...) are dropped. Duplicates are kept; the
/// frontier deduplicates.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - Final URL of the page, for resolving relative links
///
/// # Returns
///
/// Absolute http(s) URLs with fragments removed
///
/// # Example
///
/// ```
/// use site_tap::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(base_url, href))
        .collect()
}
