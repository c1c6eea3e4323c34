use serde::Serialize;
use std::path::Path;

/// One extracted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Path of the mirrored file
    pub source: String,

    /// URL the file was mirrored from
    pub page_url: String,

    /// Normalized text extracted from the page
    pub page_content: String,

    pub metadata: RecordMetadata,
}

/// Passthrough metadata carried alongside the content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub source: String,
    pub page_url: String,
}

impl Record {
    pub fn new(source: String, page_url: String, page_content: String) -> Self {
        Self {
            metadata: RecordMetadata {
                source: source.clone(),
                page_url: page_url.clone(),
            },
            source,
            page_url,
            page_content,
        }
    }
}

/// Rebuilds a page URL from a mirrored file's path
///
/// The path relative to the output root starts with the host directory, so
/// `scheme://` plus that path (with `/` separators) is the page's URL, with
/// `index.html` standing in for directory URLs.
pub fn page_url_for(scheme: &str, relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}://{}", scheme, joined)
}
