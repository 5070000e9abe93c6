//! Content tree traversal.

use std::fs;
use std::path::{Path, PathBuf};

/// Every directory under `root`, including `root` itself, in sorted pre-order.
///
/// Symlinked directories are not followed. Unreadable directories are
/// skipped along with their subtree.
#[must_use]
pub fn directories(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect(root, &mut found);
    found
}

fn collect(dir: &Path, found: &mut Vec<PathBuf>) {
    found.push(dir.to_path_buf());

    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "Skipping unreadable directory");
        return;
    };
    let mut children: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .collect();
    children.sort();

    for child in children {
        collect(&child, found);
    }
}
