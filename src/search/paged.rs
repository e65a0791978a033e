//! Paged search iterator.

use crate::{
    DirectoryConnection, Entry, PageToken, RawEntry, SearchError, SearchResult,
    search::{PagedSearchBuilder, Search, SearchState},
};
use tracing::{debug, instrument, trace, warn};

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// A memory-bounded iterator over the results of a paged directory search.
///
/// Entries are fetched from the [`DirectoryConnection`] one page at a time
/// and yielded individually, so at most one page of results is held in
/// memory. Pages are fetched lazily: construction performs no I/O, and a
/// call to [`next_entry`](Self::next_entry) fetches a page only when the
/// buffered one is used up.
///
/// The connection is borrowed for the lifetime of the search. The search
/// never opens, closes or retries it.
///
/// # Errors
///
/// Fetch failures surface from [`next_entry`](Self::next_entry) as a
/// [`SearchError`]. A failed fetch leaves the iterator exactly as it was
/// before the call, so calling `next_entry` again retries the same page.
/// A page with no entries is an error, not the end of the results: the end
/// is signalled only by the server returning no continuation token.
///
/// # Iterator
///
/// The [`Iterator`] implementation yields `SearchResult<Entry>`. After an
/// error the next call retries the fetch, so a `for` loop over a search
/// against a persistently failing connection does not terminate on its
/// own. Stop at the first error, e.g. with `collect::<Result<Vec<_>, _>>()`.
pub struct PagedSearch<'c, C: DirectoryConnection> {
    connection: &'c mut C,

    base_dn: String,
    filter: String,
    /// `None` requests all attributes.
    attributes: Option<Vec<String>>,
    page_size: u32,
    critical: bool,

    /// Continuation token from the last fetch, sent with the next one.
    token: Option<PageToken>,
    /// Set when a fetch returned no continuation token.
    last_page: bool,
    /// Zero-based number of the buffered page since the last reset.
    page_index: usize,
    /// The current page.
    page: Vec<RawEntry>,
    /// Index into `page` of the next entry to yield.
    cursor: usize,

    span: tracing::Span,
}

impl<C: DirectoryConnection> core::fmt::Debug for PagedSearch<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagedSearch")
            .field("base_dn", &self.base_dn)
            .field("filter", &self.filter)
            .field("page_size", &self.page_size)
            .field("page_index", &self.page_index)
            .field("remaining_in_page", &self.buffered())
            .field("token", &self.token)
            .field("last_page", &self.last_page)
            .finish_non_exhaustive()
    }
}

impl<'c, C: DirectoryConnection> PagedSearch<'c, C> {
    /// Creates a new search. No request is sent until the first call to
    /// [`next_entry`](Self::next_entry).
    ///
    /// `attributes` of `None` requests all attributes. `page_size` of
    /// `None` uses [`DEFAULT_PAGE_SIZE`].
    pub fn new(
        connection: &'c mut C,
        base_dn: impl Into<String>,
        filter: impl Into<String>,
        attributes: Option<Vec<String>>,
        page_size: Option<u32>,
    ) -> Self {
        Self::from_parts(
            connection,
            base_dn.into(),
            filter.into(),
            attributes,
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            true,
        )
    }

    /// Starts building a search with the default page size, all attributes,
    /// and a critical paged-results control.
    pub fn builder(
        connection: &'c mut C,
        base_dn: impl Into<String>,
        filter: impl Into<String>,
    ) -> PagedSearchBuilder<'c, C> {
        PagedSearchBuilder::new(connection, base_dn.into(), filter.into())
    }

    pub(crate) fn from_parts(
        connection: &'c mut C,
        base_dn: String,
        filter: String,
        attributes: Option<Vec<String>>,
        page_size: u32,
        critical: bool,
    ) -> Self {
        let span = tracing::debug_span!(
            target: "dirsearch",
            "paged_search",
            base_dn = %base_dn,
            filter = %filter,
            page_size,
        );
        Self {
            connection,
            base_dn,
            filter,
            attributes,
            page_size,
            critical,
            token: None,
            last_page: false,
            page_index: 0,
            page: Vec::new(),
            cursor: 0,
            span,
        }
    }

    /// The search base.
    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    /// The search filter.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The requested attributes, `None` for all attributes.
    pub fn attributes(&self) -> Option<&[String]> {
        self.attributes.as_deref()
    }

    /// The number of entries requested per page.
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether the paged-results control is sent as critical.
    pub const fn is_critical(&self) -> bool {
        self.critical
    }

    /// Zero-based number of the buffered page, counted since the last
    /// reset.
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// The continuation token that will be sent with the next fetch.
    pub const fn token(&self) -> Option<&PageToken> {
        self.token.as_ref()
    }

    /// Returns true once a fetch has returned no continuation token.
    pub const fn is_last_page(&self) -> bool {
        self.last_page
    }

    /// Number of buffered entries not yet yielded.
    pub fn buffered(&self) -> usize {
        self.page.len().saturating_sub(self.cursor)
    }

    /// The borrowed connection.
    pub fn connection(&self) -> &C {
        &*self.connection
    }

    /// The tracing span covering this search's fetches.
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Where the search is in its lifecycle.
    pub fn state(&self) -> SearchState {
        let drained = self.cursor >= self.page.len();
        match (self.last_page && self.token.is_none(), drained) {
            (true, true) => SearchState::Exhausted,
            (true, false) => SearchState::LastPageLoaded,
            (false, true) if self.page.is_empty() && self.token.is_none() => SearchState::Fresh,
            (false, _) => SearchState::Paging,
        }
    }

    /// Returns the next entry, or `None` once the result set is exhausted.
    ///
    /// Performs at most one round trip, and only when the buffered page is
    /// used up. Once `None` has been returned, further calls return `None`
    /// without contacting the server until [`reset`](Self::reset).
    pub fn next_entry(&mut self) -> SearchResult<Option<Entry>> {
        if self.cursor >= self.page.len() {
            if self.last_page && self.token.is_none() {
                return Ok(None);
            }
            self.load_page()?;
        }
        Ok(self.take_buffered())
    }

    /// Yields the entry under the cursor and advances it.
    ///
    /// Only the first page can be replayed by [`reset`](Self::reset), so
    /// later pages give up their entries instead of copying them.
    fn take_buffered(&mut self) -> Option<Entry> {
        let slot = self.page.get_mut(self.cursor)?;
        let raw = if self.page_index == 0 { slot.clone() } else { std::mem::take(slot) };
        self.cursor += 1;
        Some(Entry::from(raw))
    }

    /// Fetches one page, replacing the buffer.
    ///
    /// The new page and token are staged and committed together after every
    /// step succeeded. On error nothing is changed.
    #[instrument(level = "debug", skip(self), parent = &self.span)]
    fn load_page(&mut self) -> SearchResult<()> {
        let sent_token = self.token.is_some();

        if let Err(source) =
            self.connection.set_paged_control(self.page_size, self.critical, self.token.as_ref())
        {
            warn!(target: "dirsearch", error = %source, "paged control rejected");
            return Err(SearchError::PageControl { page_size: self.page_size, source });
        }

        let attributes = self.attributes.as_deref().unwrap_or_default();
        let mut handle = match self.connection.search(&self.base_dn, &self.filter, attributes) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(target: "dirsearch", error = %err, "search failed");
                let code = self.connection.last_error_code();
                let code = if code.is_success() { err.code } else { code };
                return Err(self.execution_error(code, false));
            }
        };

        let entries = self.connection.entries(&mut handle);
        if entries.is_empty() {
            warn!(target: "dirsearch", "search returned an empty page");
            return Err(self.execution_error(self.connection.last_error_code(), true));
        }

        let page_index = if sent_token { self.page_index + 1 } else { 0 };
        let token = self.connection.paged_control_response(&handle);

        debug!(
            target: "dirsearch",
            page = page_index,
            entries = entries.len(),
            more = token.is_some(),
            "fetched page"
        );

        self.page = entries;
        self.cursor = 0;
        self.page_index = page_index;
        if token.is_none() {
            self.last_page = true;
        }
        self.token = token;
        Ok(())
    }

    fn execution_error(&self, code: crate::ResultCode, empty_page: bool) -> SearchError {
        SearchError::Execution {
            code,
            base_dn: self.base_dn.clone(),
            filter: self.filter.clone(),
            page_size: self.page_size,
            empty_page,
        }
    }

    /// Restarts iteration from the first entry. Never fetches.
    ///
    /// If pages beyond the first have been fetched, the token and buffer are
    /// discarded and the next call to [`next_entry`](Self::next_entry)
    /// fetches the first page again. If only the first page has been
    /// fetched, it is still buffered and is replayed without a round trip.
    pub fn reset(&mut self) {
        let _guard = self.span.enter();

        if self.page_index > 0 {
            trace!(target: "dirsearch", pages = self.page_index + 1, "discarding page state");
            self.token = None;
            self.page.clear();
            self.page_index = 0;
        }

        // A buffered first page without a token is the whole result set.
        let complete = self.last_page && self.token.is_none() && !self.page.is_empty();

        self.cursor = 0;
        self.last_page = complete;
        trace!(target: "dirsearch", replay = !self.page.is_empty(), "reset");
    }

    /// Releases the buffered page and continuation token now, rather than
    /// when the search is dropped.
    ///
    /// Call [`reset`](Self::reset) before iterating again.
    pub fn free(&mut self) {
        let _guard = self.span.enter();
        trace!(target: "dirsearch", released = self.page.len(), "freeing page buffer");
        self.token = None;
        self.page = Vec::new();
        self.cursor = 0;
    }
}

impl<C: DirectoryConnection> Search for PagedSearch<'_, C> {
    fn next_entry(&mut self) -> SearchResult<Option<Entry>> {
        PagedSearch::next_entry(self)
    }

    fn reset(&mut self) {
        PagedSearch::reset(self)
    }

    fn free(&mut self) {
        PagedSearch::free(self)
    }
}

impl<C: DirectoryConnection> Iterator for PagedSearch<'_, C> {
    type Item = SearchResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
