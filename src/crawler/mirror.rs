//! Site mirror - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Fetching the root and establishing the origin
//! - Draining the frontier depth-first
//! - Discovering same-origin links in HTML pages
//! - Writing HTML bodies into the mirror layout

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::frontier::{Admission, Frontier, Work};
use crate::crawler::parser::extract_links;
use crate::state::PageState;
use crate::url::{mirror_path, parse_root_url, path_key, Origin};
use crate::TapError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use url::Url;

/// Summary of a finished mirror run
#[derive(Debug, Clone)]
pub struct MirrorReport {
    /// Same-origin boundary established from the root
    pub origin: Origin,

    /// Directory all mirror paths are relative to
    pub output_root: PathBuf,

    /// Files written in this run, relative to `output_root`, in write order
    pub files: Vec<PathBuf>,

    /// Visited path-keys grouped by outcome
    pub state_counts: BTreeMap<PageState, usize>,

    /// Number of distinct path-keys visited
    pub visited: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl MirrorReport {
    /// Directory holding this origin's mirrored files
    pub fn subtree(&self) -> PathBuf {
        self.output_root.join(self.origin.host_dir())
    }

    pub fn count(&self, state: PageState) -> usize {
        self.state_counts.get(&state).copied().unwrap_or(0)
    }
}

/// Mirrors every same-origin HTML page reachable from a root URL
pub struct SiteMirror {
    fetcher: Fetcher,
    root_url: Url,
    output_root: PathBuf,
}

impl SiteMirror {
    /// Creates a mirror for one root URL
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_tap::config::HttpConfig;
    /// use site_tap::crawler::{Fetcher, SiteMirror};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = Fetcher::new(&HttpConfig::default())?;
    /// let mirror = SiteMirror::new(fetcher, "https://example.com/docs/", "output")?;
    /// let report = mirror.run().await?;
    /// println!("{} pages mirrored", report.files.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        fetcher: Fetcher,
        root_url: &str,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self, TapError> {
        Ok(Self {
            fetcher,
            root_url: parse_root_url(root_url)?,
            output_root: output_root.into(),
        })
    }

    /// Runs the crawl to completion
    ///
    /// Only a failure to fetch the root, or to create the output directory,
    /// aborts the run. Any other fetch or write failure ends the branch it
    /// occurred in and is logged.
    pub async fn run(&self) -> Result<MirrorReport, TapError> {
        let start_time = Instant::now();
        tracing::info!("Starting mirror of {}", self.root_url);

        let root_page = self
            .fetcher
            .fetch(&self.root_url)
            .await
            .map_err(|source| TapError::RootFetch {
                url: self.root_url.to_string(),
                source,
            })?;

        if root_page.was_redirected() {
            tracing::info!("Root redirected to {}", root_page.final_url);
        }

        // Same-origin is judged against where the root actually landed
        let origin = Origin::from_final_url(&root_page.final_url)?;
        tracing::info!("Origin base: {}", origin.base());

        // Without a writable output root nothing can be mirrored
        std::fs::create_dir_all(&self.output_root)?;

        let mut frontier = Frontier::new(origin);
        let mut files = Vec::new();

        let requested_key = path_key(&self.root_url);
        let final_key = path_key(&root_page.final_url);
        frontier.claim(&requested_key);
        if final_key != requested_key {
            frontier.claim(&final_key);
            frontier.mark(&requested_key, PageState::Redirected);
        }
        self.handle_page(&mut frontier, final_key, root_page);

        let mut processed = 0usize;
        while let Some(work) = frontier.pop() {
            match work {
                Work::Visit(url) => {
                    self.visit(&mut frontier, url).await;
                    processed += 1;

                    if processed % 10 == 0 {
                        tracing::info!(
                            "Progress: {} links processed, {} path-keys visited, {} pending",
                            processed,
                            frontier.visited_len(),
                            frontier.pending_len()
                        );
                    }
                }
                Work::Persist(page) => {
                    if let Some(path) = self.persist(&mut frontier, page) {
                        files.push(path);
                    }
                }
            }
        }

        let report = MirrorReport {
            origin: frontier.origin().clone(),
            output_root: self.output_root.clone(),
            files,
            state_counts: frontier.state_counts(),
            visited: frontier.visited_len(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Mirror completed: {} files written, {} path-keys visited in {:?}",
            report.files.len(),
            report.visited,
            report.elapsed
        );

        Ok(report)
    }

    /// Visits one discovered URL
    async fn visit(&self, frontier: &mut Frontier, url: Url) {
        let key = match frontier.admit(&url) {
            Admission::Admitted(key) => key,
            Admission::OffOrigin => {
                tracing::trace!("Skipping off-origin link {}", url);
                return;
            }
            Admission::AlreadyVisited => {
                tracing::trace!("Skipping visited link {}", url);
                return;
            }
        };

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                frontier.mark(&key, PageState::Failed);
                return;
            }
        };

        // The redirect target is what gets mirrored; it must itself be
        // inside the origin and not yet visited
        if !frontier.origin().contains(&page.final_url) {
            tracing::debug!("{} redirected out of origin to {}", url, page.final_url);
            frontier.mark(&key, PageState::OffOriginRedirect);
            return;
        }

        let final_key = path_key(&page.final_url);
        if final_key == key {
            self.handle_page(frontier, key, page);
            return;
        }

        if !frontier.claim(&final_key) {
            tracing::debug!(
                "{} redirected to already visited {} ({:?})",
                url,
                page.final_url,
                frontier.state_of(&final_key)
            );
            frontier.mark(&key, PageState::Duplicate);
            return;
        }

        frontier.mark(&key, PageState::Redirected);
        self.handle_page(frontier, final_key, page);
    }

    /// Classifies a fetched page and queues its links and its write
    fn handle_page(&self, frontier: &mut Frontier, key: String, page: FetchedPage) {
        if !page.is_html() {
            tracing::debug!(
                "Not mirroring {} (content type {:?})",
                page.final_url,
                page.content_type
            );
            frontier.mark(&key, PageState::NonHtml);
            return;
        }

        let links = extract_links(&page.text(), &page.final_url);
        tracing::debug!("Found {} links on {}", links.len(), page.final_url);
        frontier.push_page(page, links);
    }

    /// Writes an HTML page into the mirror
    ///
    /// Returns the relative path written, or None if the page was skipped.
    /// A page that cannot be written only loses its own file.
    fn persist(&self, frontier: &mut Frontier, page: FetchedPage) -> Option<PathBuf> {
        let key = path_key(&page.final_url);

        let relative = match mirror_path(&page.final_url, frontier.origin()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Cannot mirror {}: {}", page.final_url, e);
                frontier.mark(&key, PageState::Failed);
                return None;
            }
        };

        if !frontier.claim_file(&relative) {
            tracing::warn!(
                "{} maps to {} which was already written in this run",
                page.final_url,
                relative.display()
            );
            frontier.mark(&key, PageState::PathCollision);
            return None;
        }

        if let Err(e) = write_file(&self.output_root.join(&relative), &page.body) {
            tracing::warn!(
                "Failed to write {} to {}: {}",
                page.final_url,
                relative.display(),
                e
            );
            frontier.mark(&key, PageState::Failed);
            return None;
        }

        tracing::debug!("Mirrored {} -> {}", page.final_url, relative.display());
        frontier.mark(&key, PageState::Mirrored);

        Some(relative)
    }
}

fn write_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}
