//! Crawl frontier for one mirror run
//!
//! The frontier owns everything a run mutates:
//! - the origin boundary, fixed at start
//! - the visited set (path-key -> state), which only grows
//! - the set of files already claimed in the mirror
//! - the pending work stack
//!
//! Traversal is depth-first in document order. An HTML page pushes its own
//! [`Work::Persist`] item below its links, so every page is written only
//! after everything reachable through it has been explored.

use crate::crawler::fetcher::FetchedPage;
use crate::state::PageState;
use crate::url::{path_key, Origin};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// A pending unit of work
#[derive(Debug)]
pub enum Work {
    /// Fetch a discovered URL
    Visit(Url),

    /// Write an HTML page whose links have all been explored
    Persist(FetchedPage),
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// URL claimed; carries the path-key now marked visited
    Admitted(String),

    /// URL does not start with the origin base
    OffOrigin,

    /// Path-key was already visited in this run
    AlreadyVisited,
}

/// Visited set and work stack of a single crawl run
#[derive(Debug)]
pub struct Frontier {
    origin: Origin,
    visited: HashMap<String, PageState>,
    claimed_files: HashSet<PathBuf>,
    pending: Vec<Work>,
}

impl Frontier {
    /// Creates an empty frontier bounded by `origin`
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            visited: HashMap::new(),
            claimed_files: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Checks a URL against the origin and the visited set, marking it
    /// visited if it passes
    ///
    /// The check and the mark happen in one `&mut self` call, so a path-key
    /// can be admitted at most once per run.
    pub fn admit(&mut self, url: &Url) -> Admission {
        if !self.origin.contains(url) {
            return Admission::OffOrigin;
        }

        let key = path_key(url);
        if self.claim(&key) {
            Admission::Admitted(key)
        } else {
            Admission::AlreadyVisited
        }
    }

    /// Marks a path-key visited; returns false if it already was
    pub fn claim(&mut self, key: &str) -> bool {
        if self.visited.contains_key(key) {
            return false;
        }
        self.visited.insert(key.to_string(), PageState::Fetching);
        true
    }

    /// Records the outcome for a visited path-key
    pub fn mark(&mut self, key: &str, state: PageState) {
        self.visited.insert(key.to_string(), state);
    }

    pub fn state_of(&self, key: &str) -> Option<PageState> {
        self.visited.get(key).copied()
    }

    /// Claims a mirror file
    ///
    /// # Arguments
    ///
    /// * `path` - The file path, relative to the output root
    ///
    /// # Returns
    ///
    /// `false` if the path was already claimed, or if it would need to be
    /// both a file and a directory: `v1.0` cannot be written once
    /// `v1.0/intro.html` exists, and the reverse.
    pub fn claim_file(&mut self, path: &Path) -> bool {
        let conflicts = self
            .claimed_files
            .iter()
            .any(|claimed| claimed.starts_with(path) || path.starts_with(claimed));
        if conflicts {
            return false;
        }
        self.claimed_files.insert(path.to_path_buf())
    }

    /// Queues the page for writing, then its links so they are explored first
    ///
    /// Links are pushed in reverse so they pop in document order.
    pub fn push_page(&mut self, page: FetchedPage, links: Vec<Url>) {
        self.pending.push(Work::Persist(page));
        self.pending
            .extend(links.into_iter().rev().map(Work::Visit));
    }

    /// Takes the next unit of work
    pub fn pop(&mut self) -> Option<Work> {
        self.pending.pop()
    }

    /// Number of pending work items
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of distinct path-keys visited so far
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Counts of visited path-keys grouped by state
    pub fn state_counts(&self) -> BTreeMap<PageState, usize> {
        let mut counts = BTreeMap::new();
        for state in self.visited.values() {
            *counts.entry(*state).or_insert(0) += 1;
        }
        counts
    }
}
