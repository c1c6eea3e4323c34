//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML classification
//! - Anchor link discovery
//! - The per-run frontier (visited set and work stack)
//! - Overall mirror orchestration

mod fetcher;
mod frontier;
mod mirror;
mod parser;

pub use fetcher::{build_http_client, is_html, FetchedPage, Fetcher};
pub use frontier::{Admission, Frontier, Work};
pub use mirror::{MirrorReport, SiteMirror};
pub use parser::extract_links;

use crate::config::Config;
use crate::TapError;

/// Runs a complete mirror of the configured site
///
/// This is the main entry point for crawling. It will:
/// 1. Build the HTTP client
/// 2. Fetch the root and establish the origin
/// 3. Explore same-origin links depth-first
/// 4. Write every HTML page under `<output-folder>/<host>/`
pub async fn mirror_site(config: &Config) -> Result<MirrorReport, TapError> {
    let fetcher = Fetcher::new(&config.http)?;
    let mirror = SiteMirror::new(fetcher, &config.tap.site_url, &config.tap.output_folder)?;
    mirror.run().await
}
