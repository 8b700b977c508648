//! In-memory session memo.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::SessionMemo;

/// [`SessionMemo`] backed by a map held in process memory.
///
/// The memo lives exactly as long as the value, which makes it the natural
/// fit for one rendering session and for tests. A poisoned lock degrades to
/// a miss on read and a dropped write.
#[derive(Debug, Default)]
pub struct MemoryMemo {
    entries: RwLock<HashMap<String, bool>>,
}

impl MemoryMemo {
    /// Create an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Whether the memo holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionMemo for MemoryMemo {
    fn try_get(&self, key: &str) -> Option<bool> {
        let entries = self.entries.read().ok()?;
        entries.get(key).copied()
    }

    fn try_set(&self, key: &str, revealed: bool) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_owned(), revealed);
            }
            Err(_) => tracing::debug!("session memo lock poisoned, dropping write for {key}"),
        }
    }
}
