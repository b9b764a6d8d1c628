//! Deduplication of push-feed entries
//!
//! Push feeds re-deliver and replay backlog, so only entries newer than
//! everything already processed may take effect.

use core::cmp::Ordering;
use core::fmt;

use heapless::String;

pub const ENTRY_ID_SIZE: usize = 32;

/// Identifier assigned to a queue entry by the delivery mechanism
///
/// Ordered by length first, then bytewise. Decimal counters therefore
/// compare numerically and fixed-length push keys chronologically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryId(String<ENTRY_ID_SIZE>);

impl EntryId {
    /// Returns `None` for empty or oversize ids
    pub fn new(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let mut value = String::new();
        value.push_str(id).ok()?;
        Some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Ord for EntryId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.as_bytes().cmp(other.0.as_bytes()))
    }
}

impl PartialOrd for EntryId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest entry id processed so far
#[derive(Debug, Clone, Default)]
pub struct DedupCursor {
    last: Option<EntryId>,
}

impl DedupCursor {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Whether `id` is at or below the cursor
    pub fn is_stale(&self, id: &EntryId) -> bool {
        self.last.as_ref().is_some_and(|last| id <= last)
    }

    /// Move the cursor to `id` if it is newer
    ///
    /// Returns `false` for stale ids, leaving the cursor untouched.
    pub fn advance(&mut self, id: &EntryId) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.last = Some(id.clone());
        true
    }

    pub fn position(&self) -> Option<&EntryId> {
        self.last.as_ref()
    }
}
