//! File-based session memo.
//!
//! [`FileMemo`] stores each key as a small file whose content is `true` or
//! `false`. The directory stands in for one browsing session:
//!
//! ```text
//! {root}/
//! +-- SESSION                 # id of the session that owns the entries
//! +-- revealed-aGlkZGVu.memo  # one entry per key
//! +-- ...
//! ```
//!
//! On construction the `SESSION` file is compared with the requested session
//! id. A mismatch or a missing file removes every `*.memo` entry, which is
//! how a new session starts from a clean slate. Other files in the directory
//! are never touched, so the memo may share a directory with user content.

use std::fs;
use std::path::{Path, PathBuf};

use crate::SessionMemo;

const SESSION_FILE: &str = "SESSION";

/// Extension of entry files. Only files with it are ever removed.
const ENTRY_EXTENSION: &str = "memo";

/// File-backed [`SessionMemo`] rooted at a directory on disk.
///
/// All I/O failures are logged and swallowed: reads become misses and writes
/// become no-ops.
pub struct FileMemo {
    root: PathBuf,
}

impl FileMemo {
    /// Open the memo at `root` for `session`.
    ///
    /// Entries written under a different session id are discarded. Errors
    /// while preparing the directory are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, session: &str) -> Self {
        validate_session(&root, session);
        Self { root }
    }

    /// Root directory of this memo.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        if !is_safe_key(key) {
            tracing::debug!("rejecting session memo key {key:?}");
            return None;
        }
        Some(self.root.join(format!("{key}.{ENTRY_EXTENSION}")))
    }
}

impl SessionMemo for FileMemo {
    fn try_get(&self, key: &str) -> Option<bool> {
        let path = self.entry_path(key)?;
        let content = fs::read_to_string(&path).ok()?;
        match content.trim() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                tracing::debug!("ignoring unreadable memo entry {}: {other:?}", path.display());
                None
            }
        }
    }

    fn try_set(&self, key: &str, revealed: bool) {
        let Some(path) = self.entry_path(key) else {
            return;
        };

        if let Err(e) = fs::create_dir_all(&self.root) {
            tracing::warn!("failed to create session memo directory: {e}");
            return;
        }
        let value = if revealed { "true" } else { "false" };
        if let Err(e) = fs::write(&path, value) {
            tracing::warn!("failed to write session memo entry {}: {e}", path.display());
        }
    }
}

/// Keys become file names, so they must stay a single path component.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['/', '\\', '\0'])
}

/// Validate the session marker, clearing entries on mismatch.
fn validate_session(root: &Path, session: &str) {
    let session_file = root.join(SESSION_FILE);

    match fs::read_to_string(&session_file) {
        Ok(stored) if stored == session => {
            tracing::debug!("session memo matches session {session}");
            return;
        }
        Ok(stored) => {
            tracing::info!("session changed (stored={stored}, current={session}), clearing memo");
        }
        Err(_) => {
            tracing::info!("no SESSION file found, initializing session memo");
        }
    }

    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create session memo directory: {e}");
        return;
    }
    clear_entries(root);
    if let Err(e) = fs::write(&session_file, session) {
        tracing::warn!("failed to write SESSION file: {e}");
    }
}

/// Remove memo entry files from `root`, leaving everything else in place.
fn clear_entries(root: &Path) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("failed to list session memo directory: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_memo_entry = entry.file_type().is_ok_and(|t| t.is_file())
            && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION);
        if is_memo_entry && let Err(e) = fs::remove_file(&path) {
            tracing::warn!("failed to remove memo entry {}: {e}", path.display());
        }
    }
}
