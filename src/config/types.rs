use crate::extract::{ParserKind, Selection};
use serde::Deserialize;

/// Main configuration structure for Site-Tap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tap: TapConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Source and storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct TapConfig {
    /// Name of the source being scraped, used as the stream name
    #[serde(rename = "source-name")]
    pub source_name: String,

    /// Root URL the crawl starts from
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// Directory the mirrored HTML files are written to
    #[serde(rename = "output-folder", default = "default_output_folder")]
    pub output_folder: String,

    /// HTML parser used for extraction
    #[serde(default)]
    pub parser: ParserKind,

    /// Crawl the site before processing the output folder
    #[serde(rename = "download-recursively", default = "default_true")]
    pub download_recursively: bool,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per fetch
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Which elements' text is kept
    #[serde(default)]
    pub selection: Selection,

    /// Tags stripped from selected elements before text is pulled
    #[serde(rename = "exclude-tags", default)]
    pub exclude_tags: Vec<String>,

    /// Extension matched when processing an existing folder
    #[serde(rename = "file-extension", default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            exclude_tags: Vec::new(),
            file_extension: default_file_extension(),
        }
    }
}

fn default_output_folder() -> String {
    "output".to_string()
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("site-tap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_file_extension() -> String {
    "html".to_string()
}
