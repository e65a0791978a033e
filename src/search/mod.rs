//! Search result iteration.
//!
//! # Search Types
//!
//! | Search | Source | Memory |
//! |--------|--------|--------|
//! | [`PagedSearch`] | [`DirectoryConnection`], one page per round trip | one page |
//! | [`PreloadedSearch`] | an already fetched `Vec<RawEntry>` | whole result set |
//!
//! Both implement [`Search`], and the standard [`Iterator`] trait.
//!
//! # Paging
//!
//! [`PagedSearch`] fetches lazily: constructing it performs no I/O, and
//! each call to [`next_entry`](PagedSearch::next_entry) performs at most one
//! round trip, only when the buffered page is used up. The end of the
//! result set is signalled by the server returning no continuation token.
//!
//! # Example
//!
//! ```
//! use dirsearch::{MemoryDirectory, PagedSearch, RawEntry};
//!
//! let mut directory: MemoryDirectory = (0..5)
//!     .map(|i| RawEntry::new(format!("cn=user{i},dc=example,dc=com")))
//!     .collect();
//!
//! let mut search = PagedSearch::builder(&mut directory, "dc=example,dc=com", "(objectClass=*)")
//!     .page_size(2)
//!     .build();
//!
//! let mut dns = Vec::new();
//! while let Some(entry) = search.next_entry()? {
//!     dns.push(entry.dn().to_owned());
//! }
//! assert_eq!(dns.len(), 5);
//! assert_eq!(directory.searches(), 3);
//! # Ok::<_, dirsearch::SearchError>(())
//! ```
//!
//! [`DirectoryConnection`]: crate::DirectoryConnection

use crate::{Entry, SearchResult};

mod builder;
pub use builder::PagedSearchBuilder;

mod paged;
pub use paged::{DEFAULT_PAGE_SIZE, PagedSearch};

mod preloaded;
pub use preloaded::PreloadedSearch;

/// Common surface of all searches.
pub trait Search {
    /// Returns the next entry, or `None` once the result set is exhausted.
    fn next_entry(&mut self) -> SearchResult<Option<Entry>>;

    /// Restarts iteration from the first entry.
    fn reset(&mut self);

    /// Releases buffered entries immediately. Call [`reset`](Self::reset)
    /// before iterating again.
    fn free(&mut self);

    /// Drains the remaining entries into a vector.
    fn collect_entries(&mut self) -> SearchResult<Vec<Entry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Position of a [`PagedSearch`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    /// Nothing buffered; the next call fetches the first page.
    Fresh,
    /// A page is buffered and the server has more pages.
    Paging,
    /// The final page is buffered and entries remain in it.
    LastPageLoaded,
    /// Every entry has been yielded. Terminal until reset.
    Exhausted,
}

impl SearchState {
    /// Returns true once no further entries or fetches will happen.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exhausted)
    }
}
