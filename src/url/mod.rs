//! URL handling module for Site-Tap
//!
//! This module resolves links against the page they were found on, computes
//! the path-key used for dedup, establishes the same-origin boundary of a
//! crawl, and maps URLs onto the mirror's file layout.

mod normalize;
mod origin;
mod path_map;

pub use normalize::{parse_root_url, path_key, resolve_href};
pub use origin::{host_dir, Origin};
pub use path_map::{mirror_path, INDEX_FILE};
