use crate::UrlError;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Parses and validates the root URL of a crawl
///
/// # Examples
///
/// ```
/// use site_tap::url::parse_root_url;
///
/// let url = parse_root_url("https://example.com/docs/").unwrap();
/// assert_eq!(url.path(), "/docs/");
/// assert!(parse_root_url("ftp://example.com/").is_err());
/// ```
pub fn parse_root_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves an anchor's href against the URL of the page it appeared on
///
/// Standard URL-join semantics apply (relative paths, `..`, absolute
/// paths, scheme-relative links). The fragment of the result is dropped.
///
/// Returns None if the link can never be crawled:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - anything that does not resolve to http(s)
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

/// Returns the dedup identity of a URL: its path, query and fragment stripped
///
/// Two URLs that differ only by query string share a path-key and are
/// therefore fetched and mirrored once. No trailing-slash folding is done.
pub fn path_key(url: &Url) -> String {
    url.path().to_string()
}
