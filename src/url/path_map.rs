use crate::url::Origin;
use crate::UrlError;
use std::path::{Path, PathBuf};
use url::Url;

/// File name substituted for directory-like URLs
pub const INDEX_FILE: &str = "index.html";

/// Maps a URL to its file path relative to the output root
///
/// The result is `<host_dir>/<path segments>`. A path that is empty, ends in
/// `/`, or whose last segment has no extension is directory-like and gets
/// [`INDEX_FILE`] appended. Segments are kept percent-encoded so a `%2F` can
/// never introduce a separator.
///
/// # Examples
///
/// ```
/// use site_tap::url::{mirror_path, Origin};
/// use std::path::PathBuf;
/// use url::Url;
///
/// let root = Url::parse("https://example.com/docs/").unwrap();
/// let origin = Origin::from_final_url(&root).unwrap();
/// assert_eq!(
///     mirror_path(&root, &origin).unwrap(),
///     PathBuf::from("example.com/docs/index.html")
/// );
/// ```
pub fn mirror_path(url: &Url, origin: &Origin) -> Result<PathBuf, UrlError> {
    let mut path = PathBuf::from(origin.host_dir());
    let trimmed = url.path().trim_start_matches('/');

    let mut last = "";
    for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains('\\') {
            return Err(UrlError::UnsafePath(url.path().to_string()));
        }
        path.push(segment);
        last = segment;
    }

    if trimmed.is_empty() || trimmed.ends_with('/') || !has_extension(last) {
        path.push(INDEX_FILE);
    }

    Ok(path)
}

/// Whether a path segment names a file rather than a directory
pub(crate) fn has_extension(segment: &str) -> bool {
    Path::new(segment)
        .extension()
        .map_or(false, |ext| !ext.is_empty())
}
