//! Session-scoped reveal memo for Veil.
//!
//! A [`SessionMemo`] remembers which gated blocks were already revealed during
//! the current session, so that re-rendering a page does not ask for the same
//! credential twice. The memo is a convenience cache, never a source of truth:
//! every backend is best-effort and an unavailable medium only loses the
//! memoization, it never fails the caller.
//!
//! # Implementations
//!
//! - [`NullMemo`]: No-op implementation (storage disabled, always misses)
//! - [`MemoryMemo`]: In-process map, lives as long as the value
//! - [`FileMemo`]: One file per key, cleared when the session id changes
//!
//! # Example
//!
//! ```
//! use veil_memo::{MemoryMemo, SessionMemo};
//!
//! let memo = MemoryMemo::new();
//! assert_eq!(memo.try_get("revealed-aGlkZGVu"), None);
//!
//! memo.try_set("revealed-aGlkZGVu", true);
//! assert_eq!(memo.try_get("revealed-aGlkZGVu"), Some(true));
//! ```

mod file;
mod memory;

pub use file::FileMemo;
pub use memory::MemoryMemo;

/// Best-effort key-value store of "previously revealed" flags.
///
/// Keys are opaque fingerprints chosen by the caller. Implementations must
/// never panic or propagate storage failures: a failed read is reported as a
/// miss and a failed write is silently dropped.
pub trait SessionMemo: Send + Sync {
    /// Look up the flag stored under `key`.
    ///
    /// Returns `None` when nothing is stored or the medium is unavailable.
    fn try_get(&self, key: &str) -> Option<bool>;

    /// Store `revealed` under `key`, overwriting any previous value.
    fn try_set(&self, key: &str, revealed: bool);
}

/// No-op [`SessionMemo`] that never stores or retrieves anything.
///
/// Used when session storage is disabled or inaccessible.
pub struct NullMemo;

impl SessionMemo for NullMemo {
    fn try_get(&self, _key: &str) -> Option<bool> {
        None
    }

    fn try_set(&self, _key: &str, _revealed: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_memo_always_misses() {
        let memo = NullMemo;

        assert_eq!(memo.try_get("key"), None);

        // Setting a value and reading it back still returns None
        memo.try_set("key", true);
        assert_eq!(memo.try_get("key"), None);
    }

    #[test]
    fn test_memo_is_object_safe() {
        let memos: Vec<Box<dyn SessionMemo>> =
            vec![Box::new(NullMemo), Box::new(MemoryMemo::new())];

        for memo in &memos {
            memo.try_set("k", true);
        }
        assert_eq!(memos[0].try_get("k"), None);
        assert_eq!(memos[1].try_get("k"), Some(true));
    }
}
