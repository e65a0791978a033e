//! Directory entries.
//!
//! A [`DirectoryConnection`] returns each page of a search as a list of
//! [`RawEntry`] records. Searches hand them to callers one at a time, wrapped
//! in an [`Entry`].
//!
//! [`DirectoryConnection`]: crate::DirectoryConnection

mod entry;
pub use entry::Entry;

mod raw;
pub use raw::{ALL_ATTRIBUTES, Attribute, NO_ATTRIBUTES, RawEntry, Values};
