use crate::TapError;
use jwalk::{Parallelism, WalkDir};
use std::path::{Path, PathBuf};

/// Which files of a mirrored subtree are documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFilter {
    /// Every regular file
    All,

    /// Files whose extension equals this one (no leading dot)
    Extension(String),
}

impl FileFilter {
    fn accepts(&self, path: &Path) -> bool {
        match self {
            Self::All => true,
            Self::Extension(ext) => path
                .extension()
                .map_or(false, |e| e.to_string_lossy() == ext.as_str()),
        }
    }
}

/// Lists the document files under `root`, sorted
///
/// A missing root is an empty listing, not an error; the caller decides
/// whether zero documents is fatal.
pub fn discover_documents(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>, TapError> {
    if !root.is_dir() {
        tracing::debug!("{} does not exist or is not a directory", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
    {
        let entry = entry.map_err(|e| TapError::Walk {
            dir: root.to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if filter.accepts(&path) {
            files.push(path);
        }
    }

    Ok(files)
}
