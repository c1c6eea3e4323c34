//! Site-Tap: mirror a website and turn its pages into text records
//!
//! This crate crawls a single origin starting from a root URL, mirrors every
//! same-origin HTML page to disk, and extracts normalized plain text from the
//! mirrored files according to a caller-supplied selection rule.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Tap operations
#[derive(Debug, Error)]
pub enum TapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch root URL {url}: {source}")]
    RootFetch { url: String, source: FetchError },

    #[error("No documents found in {}", dir.display())]
    NoDocumentsFound { dir: PathBuf },

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to enumerate {}: {message}", dir.display())]
    Walk { dir: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("URL path cannot be mapped to a file: {0}")]
    UnsafePath(String),
}

/// Failure of a single page fetch
///
/// These never abort a crawl on their own; the branch that hit them is
/// abandoned and its siblings continue.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns true for DNS, connect and timeout failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport { .. })
    }

    /// Returns the HTTP status code for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extraction rule errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Site-Tap operations
pub type Result<T> = std::result::Result<T, TapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ExtractionRule, Extractor, Selection};
pub use pipeline::{Pipeline, Record, Records};
pub use state::PageState;
pub use url::{mirror_path, path_key, resolve_href, Origin};
