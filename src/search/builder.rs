use crate::{DirectoryConnection, PagedSearch, search::DEFAULT_PAGE_SIZE};

/// Options for a [`PagedSearch`].
///
/// Created with [`PagedSearch::builder`]. Defaults: [`DEFAULT_PAGE_SIZE`]
/// entries per page, all attributes, critical paged-results control.
///
/// ```
/// use dirsearch::{MemoryDirectory, PagedSearch};
///
/// let mut directory = MemoryDirectory::new();
/// let search = PagedSearch::builder(&mut directory, "ou=people,dc=example,dc=com", "(uid=*)")
///     .attributes(["uid", "mail"])
///     .page_size(250)
///     .build();
/// assert_eq!(search.page_size(), 250);
/// ```
#[must_use = "a builder does nothing until `build` is called"]
pub struct PagedSearchBuilder<'c, C: DirectoryConnection> {
    connection: &'c mut C,
    base_dn: String,
    filter: String,
    attributes: Option<Vec<String>>,
    page_size: u32,
    critical: bool,
}

impl<C: DirectoryConnection> core::fmt::Debug for PagedSearchBuilder<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagedSearchBuilder")
            .field("base_dn", &self.base_dn)
            .field("filter", &self.filter)
            .field("attributes", &self.attributes)
            .field("page_size", &self.page_size)
            .field("critical", &self.critical)
            .finish_non_exhaustive()
    }
}

impl<'c, C: DirectoryConnection> PagedSearchBuilder<'c, C> {
    pub(crate) const fn new(connection: &'c mut C, base_dn: String, filter: String) -> Self {
        Self {
            connection,
            base_dn,
            filter,
            attributes: None,
            page_size: DEFAULT_PAGE_SIZE,
            critical: true,
        }
    }

    /// Requests only the named attributes.
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Requests all attributes. This is the default.
    pub fn all_attributes(mut self) -> Self {
        self.attributes = None;
        self
    }

    /// Sets the number of entries requested per page.
    ///
    /// The value is passed to the connection unchecked; connections reject
    /// sizes they cannot serve (such as zero) on the first fetch.
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets whether the paged-results control is marked critical.
    ///
    /// A server that does not support paging fails a critical request, and
    /// may answer a non-critical one with the whole result set at once.
    pub const fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Builds the search. Performs no I/O.
    pub fn build(self) -> PagedSearch<'c, C> {
        PagedSearch::from_parts(
            self.connection,
            self.base_dn,
            self.filter,
            self.attributes,
            self.page_size,
            self.critical,
        )
    }
}
