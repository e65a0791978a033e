//! The directory connection seam.

use crate::{DirectoryResult, PageToken, RawEntry, ResultCode};

/// A connection able to run paged searches against a directory service.
///
/// A paged search is a sequence of round trips. For each page the search
/// iterator:
///
/// 1. attaches the paged-results control with
///    [`set_paged_control`](Self::set_paged_control),
/// 2. runs [`search`](Self::search),
/// 3. drains the page with [`entries`](Self::entries),
/// 4. reads the continuation token back with
///    [`paged_control_response`](Self::paged_control_response).
///
/// Connection setup, authentication, timeouts and the wire protocol are the
/// implementor's business. The iterator only borrows the connection and
/// never opens, closes or retries it.
pub trait DirectoryConnection {
    /// Per-search state returned by [`search`](Self::search), holding the
    /// page of results and the response controls.
    type Handle;

    /// Sets the paged-results control for the next [`search`](Self::search).
    ///
    /// `token` is `None` for the first page, otherwise the token from the
    /// previous response, passed back verbatim. Implementations reject an
    /// invalid page size or malformed token here.
    fn set_paged_control(
        &mut self,
        page_size: u32,
        critical: bool,
        token: Option<&PageToken>,
    ) -> DirectoryResult<()>;

    /// Runs one search round trip. An empty `attributes` slice requests all
    /// attributes.
    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
    ) -> DirectoryResult<Self::Handle>;

    /// Takes the entries of the page held by `handle`. May be empty.
    fn entries(&mut self, handle: &mut Self::Handle) -> Vec<RawEntry>;

    /// The continuation token returned with the page, `None` if the server
    /// sent no token or an empty one.
    fn paged_control_response(&mut self, handle: &Self::Handle) -> Option<PageToken>;

    /// The result code of the most recent operation.
    fn last_error_code(&self) -> ResultCode;
}
