//! Per-document cache under the configured cache root.
//!
//! Each opened document gets its own directory named after a SHA-256 of its
//! path. It holds `bookmark.toml` with the last shown slide and a `slides/`
//! directory of rendered pages (see the loader).

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CACHE_DIR: &str = ".cache";

#[derive(serde::Serialize, serde::Deserialize)]
struct Bookmark {
    slide: usize,
}

pub fn hash_dir(cache_root: &Path, document: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(document.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_root.join(hash)
}

pub fn slides_dir(cache_root: &Path, document: &Path) -> PathBuf {
    hash_dir(cache_root, document).join("slides")
}

fn bookmark_path(cache_root: &Path, document: &Path) -> PathBuf {
    hash_dir(cache_root, document).join("bookmark.toml")
}

/// Slide index saved the last time this document was open, if any.
pub fn load_last_slide(cache_root: &Path, document: &Path) -> Option<usize> {
    let data = fs::read_to_string(bookmark_path(cache_root, document)).ok()?;
    let bookmark: Bookmark = toml::from_str(&data).ok()?;
    Some(bookmark.slide)
}

/// Persist the current slide. Failures are logged and otherwise ignored so
/// navigation never stalls on disk trouble.
pub fn save_last_slide(cache_root: &Path, document: &Path, slide: usize) {
    let path = bookmark_path(cache_root, document);
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "Could not create cache dir: {err}");
            return;
        }
    }
    match toml::to_string(&Bookmark { slide }) {
        Ok(contents) => {
            if let Err(err) = fs::write(&path, contents) {
                warn!(path = %path.display(), "Could not save bookmark: {err}");
            } else {
                debug!(slide, path = %path.display(), "Saved bookmark");
            }
        }
        Err(err) => warn!("Could not encode bookmark: {err}"),
    }
}
