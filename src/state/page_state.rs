/// Page state definitions for tracking crawl progress
///
/// Every path-key in a run's visited set carries one of these states.
use std::fmt;

/// Represents the state of a visited path-key within one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Path-key is claimed and its fetch is in flight, or its HTML body is
    /// waiting for its links to be explored before being written
    Fetching,

    // ===== Terminal Success States =====
    /// HTML body was written to the mirror
    Mirrored,

    /// Response was not HTML; fetched but never written
    NonHtml,

    /// Requested path-key whose content was recorded under the key of the
    /// redirect target
    Redirected,

    // ===== Terminal Skip States =====
    /// Redirect landed on a path-key that was already visited
    Duplicate,

    /// Redirect left the origin base; never mirrored
    OffOriginRedirect,

    /// Path-key mapped to a file that another key already wrote
    PathCollision,

    // ===== Terminal Error States =====
    /// Transport failure or non-2xx status; no links were discovered
    Failed,
}

impl PageState {
    /// Returns true if the page ended up on disk
    pub fn is_mirrored(&self) -> bool {
        matches!(self, Self::Mirrored)
    }

    /// Returns true if the path-key was deliberately left unwritten
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::Duplicate | Self::OffOriginRedirect | Self::PathCollision
        )
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Short stable label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Mirrored => "mirrored",
            Self::NonHtml => "non_html",
            Self::Redirected => "redirected",
            Self::Duplicate => "duplicate",
            Self::OffOriginRedirect => "off_origin_redirect",
            Self::PathCollision => "path_collision",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::Mirrored,
            Self::NonHtml,
            Self::Redirected,
            Self::Duplicate,
            Self::OffOriginRedirect,
            Self::PathCollision,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
