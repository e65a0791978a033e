//! Search over an already fetched result set.

use crate::{Entry, RawEntry, SearchResult, search::Search};

/// A search over results that are already in memory.
///
/// Useful when a connection returned the whole result set in one response,
/// or when callers want the [`Search`] surface over a fixed list. Iteration
/// never fails and never wraps around: once the entries are used up it keeps
/// returning `None` until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct PreloadedSearch {
    entries: Vec<RawEntry>,
    position: usize,
}

impl PreloadedSearch {
    /// Wraps the given entries, yielded in order.
    pub const fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries, position: 0 }
    }

    /// Total number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries not yet yielded.
    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.position)
    }

    /// Rewinds to the first entry.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Drops the held entries.
    pub fn free(&mut self) {
        self.entries = Vec::new();
        self.position = 0;
    }
}

impl From<Vec<RawEntry>> for PreloadedSearch {
    fn from(entries: Vec<RawEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<RawEntry> for PreloadedSearch {
    fn from_iter<T: IntoIterator<Item = RawEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Iterator for PreloadedSearch {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.entries.get(self.position)?.clone();
        self.position += 1;
        Some(raw.into())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PreloadedSearch {}

impl Search for PreloadedSearch {
    fn next_entry(&mut self) -> SearchResult<Option<Entry>> {
        Ok(self.next())
    }

    fn reset(&mut self) {
        PreloadedSearch::reset(self)
    }

    fn free(&mut self) {
        PreloadedSearch::free(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> PreloadedSearch {
        ["d", "e", "f"].into_iter().map(RawEntry::new).collect()
    }

    fn dn(entry: Option<Entry>) -> Option<String> {
        entry.map(|e| e.dn().to_owned())
    }

    #[test]
    fn yields_then_stays_exhausted() {
        let mut search = def();
        assert_eq!(dn(search.next()).as_deref(), Some("d"));
        assert_eq!(dn(search.next()).as_deref(), Some("e"));
        assert_eq!(dn(search.next()).as_deref(), Some("f"));
        assert!(search.next().is_none());
        assert!(search.next().is_none());
        assert!(search.next().is_none(), "does not wrap around at the end");

        search.reset();
        assert_eq!(dn(search.next()).as_deref(), Some("d"));
        assert_eq!(dn(search.next()).as_deref(), Some("e"));

        search.reset();
        assert_eq!(dn(search.next()).as_deref(), Some("d"));
    }

    #[test]
    fn search_trait_surface() {
        let mut search = def();
        assert_eq!(search.collect_entries().unwrap().len(), 3);
        assert_eq!(Search::next_entry(&mut search).unwrap(), None);
        Search::free(&mut search);
        Search::reset(&mut search);
        assert!(search.is_empty());
        assert_eq!(Search::next_entry(&mut search).unwrap(), None);
    }
}
