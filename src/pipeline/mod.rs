//! Pipeline driver: mirrored files in, text records out
//!
//! The pipeline runs in one of two modes:
//! - crawl-then-process: mirror the site, then enumerate every file under
//!   the origin's mirrored subtree
//! - process-only: enumerate files with the configured extension under an
//!   existing `<output-folder>/<host>` tree
//!
//! Either way, enumerating zero files is fatal. Records are produced lazily,
//! one file read and extracted per call to `next()`.

mod discovery;
mod record;

pub use discovery::{discover_documents, FileFilter};
pub use record::{page_url_for, Record, RecordMetadata};

use crate::config::Config;
use crate::crawler::mirror_site;
use crate::extract::{ExtractionRule, Extractor};
use crate::output::log_report;
use crate::url::{host_dir, parse_root_url};
use crate::TapError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Produces records for one configured source
pub struct Pipeline {
    config: Config,
    extractor: Arc<Extractor>,
}

impl Pipeline {
    /// Builds the pipeline and compiles its extraction rule
    pub fn new(config: Config) -> Result<Self, TapError> {
        let rule = ExtractionRule::from_config(&config.extract);
        let extractor = Extractor::new(rule, config.tap.parser)?;
        Ok(Self {
            config,
            extractor: Arc::new(extractor),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a fresh pass over the source
    ///
    /// Each call crawls again (in crawl mode) and re-enumerates the files;
    /// the returned iterator reads and extracts them lazily.
    ///
    /// # Errors
    ///
    /// * `TapError::RootFetch` - the root URL could not be fetched
    /// * `TapError::NoDocumentsFound` - nothing to process
    pub async fn records(&self) -> Result<Records, TapError> {
        let output_root = PathBuf::from(&self.config.tap.output_folder);

        let (subtree, filter, scheme) = if self.config.tap.download_recursively {
            let report = mirror_site(&self.config).await?;
            log_report(&report);
            (
                report.subtree(),
                FileFilter::All,
                report.origin.base().scheme().to_string(),
            )
        } else {
            let root_url = parse_root_url(&self.config.tap.site_url)?;
            (
                output_root.join(host_dir(&root_url)?),
                FileFilter::Extension(self.config.extract.file_extension.clone()),
                root_url.scheme().to_string(),
            )
        };

        let files = discover_documents(&subtree, &filter)?;
        if files.is_empty() {
            return Err(TapError::NoDocumentsFound { dir: subtree });
        }

        tracing::info!("Found {} documents under {}", files.len(), subtree.display());

        Ok(Records {
            files: files.into_iter(),
            extractor: Arc::clone(&self.extractor),
            output_root,
            scheme,
        })
    }
}

/// Lazy sequence of records, one per document file
pub struct Records {
    files: std::vec::IntoIter<PathBuf>,
    extractor: Arc<Extractor>,
    output_root: PathBuf,
    scheme: String,
}

impl Records {
    fn process(&self, path: &Path) -> Result<Record, TapError> {
        let bytes = std::fs::read(path)?;
        let html = String::from_utf8_lossy(&bytes);
        let text = self.extractor.extract(&html);

        if text.is_empty() {
            tracing::warn!(
                "Could not find contents in file {}, using selection {:?}",
                path.display(),
                self.extractor.rule().selection
            );
        }

        let relative = path.strip_prefix(&self.output_root).unwrap_or(path);
        Ok(Record::new(
            path.display().to_string(),
            page_url_for(&self.scheme, relative),
            text,
        ))
    }
}

impl Iterator for Records {
    type Item = Result<Record, TapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        Some(self.process(&path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

impl ExactSizeIterator for Records {}
