//! Memory-bounded iteration over paged directory searches.
//!
//! # Overview
//!
//! Directory servers cap the number of entries a single search may return.
//! The paged-results control (RFC 2696) works around the cap: the client
//! asks for a page of at most `N` entries, and the server answers with the
//! page plus an opaque cookie that requests the next one. An empty cookie
//! ends the result set.
//!
//! This crate wraps that protocol in an iterator:
//! - [`PagedSearch`] yields entries one at a time while holding at most one
//!   page in memory, fetching the next page only when the current one is
//!   used up.
//! - [`PreloadedSearch`] offers the same surface over a result set that is
//!   already in memory.
//! - [`DirectoryConnection`] is the seam to the directory client. The
//!   iterator borrows a connection and never opens, closes or retries it.
//! - [`MemoryDirectory`] is an in-memory [`DirectoryConnection`] with real
//!   paging behaviour, for tests and examples.
//!
//! # Quick Start
//!
//! ```
//! use dirsearch::{MemoryDirectory, PagedSearch, RawEntry, SearchResult};
//!
//! fn main() -> SearchResult<()> {
//!     let mut directory = MemoryDirectory::new();
//!     for name in ["ada", "grace", "edsger"] {
//!         directory.insert(
//!             RawEntry::new(format!("uid={name},ou=people,dc=example,dc=com"))
//!                 .with_attribute("uid", [name])
//!                 .with_attribute("objectClass", ["person"]),
//!         );
//!     }
//!
//!     let search = PagedSearch::builder(&mut directory, "ou=people,dc=example,dc=com", "(objectClass=person)")
//!         .attributes(["uid"])
//!         .page_size(2)
//!         .build();
//!
//!     let uids = search
//!         .map(|entry| entry.map(|e| e.first_str("uid").unwrap_or_default().to_owned()))
//!         .collect::<SearchResult<Vec<_>>>()?;
//!     assert_eq!(uids, ["ada", "grace", "edsger"]);
//!
//!     // two pages of at most two entries
//!     assert_eq!(directory.searches(), 2);
//!     Ok(())
//! }
//! ```
//!
//! # Key Concepts
//!
//! - [`PageToken`] - The server's continuation cookie. Opaque, never empty,
//!   passed back verbatim.
//! - [`Entry`] and [`RawEntry`] - A search result: a DN and its attributes.
//!   Connections produce [`RawEntry`] values, searches yield [`Entry`].
//! - [`SearchError`] - Fetch failures. A failed fetch leaves the search
//!   unchanged, so the next call retries it.
//! - [`ResultCode`] - Directory result codes, server and client side.
//!
//! # Logging
//!
//! Each [`PagedSearch`] carries a [`tracing`] span under the `dirsearch`
//! target. Page fetches are logged at `debug`, rejected fetches at `warn`,
//! and resets at `trace`.
//!
//! # Imports
//!
//! For most use cases, import from the crate root. Attribute helpers live
//! in [`entries`], and the filter engine of the in-memory directory in
//! [`memory`].

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod connection;
pub use connection::DirectoryConnection;

pub mod entries;
pub use entries::{Attribute, Entry, RawEntry};

mod error;
pub use error::{DirectoryError, DirectoryResult, ResultCode, SearchError, SearchResult};

pub mod memory;
pub use memory::{Fault, Filter, MemoryDirectory, MemoryHandle};

pub mod search;
pub use search::{
    DEFAULT_PAGE_SIZE, PagedSearch, PagedSearchBuilder, PreloadedSearch, Search, SearchState,
};

mod token;
pub use token::PageToken;
