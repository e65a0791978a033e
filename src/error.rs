use std::fmt;

/// A directory result code.
///
/// Positive values are LDAP result codes as returned by the server
/// (RFC 4511, section 4.1.9). Negative values are client-library codes
/// raised before a request reaches the wire, following the OpenLDAP
/// client convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultCode(pub i32);

impl ResultCode {
    /// The operation completed successfully.
    pub const SUCCESS: Self = Self(0);
    /// The server encountered an internal ordering or sequencing error.
    pub const OPERATIONS_ERROR: Self = Self(1);
    /// The request violated the protocol.
    pub const PROTOCOL_ERROR: Self = Self(2);
    /// The time limit on the search was exceeded.
    pub const TIME_LIMIT_EXCEEDED: Self = Self(3);
    /// The size limit on the search was exceeded.
    pub const SIZE_LIMIT_EXCEEDED: Self = Self(4);
    /// A critical control was not recognized by the server.
    pub const UNAVAILABLE_CRITICAL_EXTENSION: Self = Self(12);
    /// The search base does not exist.
    pub const NO_SUCH_OBJECT: Self = Self(32);
    /// The bound identity may not perform the search.
    pub const INSUFFICIENT_ACCESS_RIGHTS: Self = Self(50);
    /// The server is too busy to service the request.
    pub const BUSY: Self = Self(51);
    /// The server is shutting down or otherwise unavailable.
    pub const UNAVAILABLE: Self = Self(52);
    /// The server declined to perform the request.
    pub const UNWILLING_TO_PERFORM: Self = Self(53);
    /// Catch-all server failure.
    pub const OTHER: Self = Self(80);
    /// The connection to the server was lost.
    pub const SERVER_DOWN: Self = Self(-1);
    /// The client timed out waiting for a response.
    pub const TIMEOUT: Self = Self(-5);
    /// The search filter could not be parsed.
    pub const FILTER_ERROR: Self = Self(-7);
    /// An argument passed to the client library was invalid.
    pub const PARAM_ERROR: Self = Self(-9);

    /// Returns the raw integer code.
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns true for [`ResultCode::SUCCESS`].
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Short symbolic name, if the code is one of the named constants.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "success",
            1 => "operationsError",
            2 => "protocolError",
            3 => "timeLimitExceeded",
            4 => "sizeLimitExceeded",
            12 => "unavailableCriticalExtension",
            32 => "noSuchObject",
            50 => "insufficientAccessRights",
            51 => "busy",
            52 => "unavailable",
            53 => "unwillingToPerform",
            80 => "other",
            -1 => "serverDown",
            -5 => "timeout",
            -7 => "filterError",
            -9 => "paramError",
            _ => return None,
        })
    }
}

impl From<i32> for ResultCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "result code {}", self.0),
        }
    }
}

/// An error reported by a [`DirectoryConnection`].
///
/// [`DirectoryConnection`]: crate::DirectoryConnection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct DirectoryError {
    /// The directory result code.
    pub code: ResultCode,
    /// Diagnostic message, as supplied by the server or client library.
    pub message: String,
}

impl DirectoryError {
    /// Creates a new error from a code and diagnostic message.
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Errors raised while fetching pages of a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The connection rejected the paged-results parameters (invalid page
    /// size, malformed continuation token).
    #[error("unable to set paged control (page size {page_size}): {source}")]
    PageControl {
        /// The page size that was requested.
        page_size: u32,
        /// The connection's reason for rejecting the control.
        #[source]
        source: DirectoryError,
    },
    /// The search request failed, or succeeded with an empty page.
    #[error(
        "search failed with {code} (base: {base_dn:?}, filter: {filter:?}, page size: {page_size}{})",
        empty_page_suffix(.empty_page)
    )]
    Execution {
        /// Last error code reported by the connection.
        code: ResultCode,
        /// The search base.
        base_dn: String,
        /// The search filter.
        filter: String,
        /// The page size in effect.
        page_size: u32,
        /// True when the search completed but returned zero entries.
        empty_page: bool,
    },
}

impl SearchError {
    /// Returns the directory result code associated with this error.
    pub const fn code(&self) -> ResultCode {
        match self {
            Self::PageControl { source, .. } => source.code,
            Self::Execution { code, .. } => *code,
        }
    }

    /// Returns true if the error was raised for a page with no entries.
    pub const fn is_empty_page(&self) -> bool {
        matches!(self, Self::Execution { empty_page: true, .. })
    }

    /// Returns true if the error was raised while setting the paged control.
    pub const fn is_page_control(&self) -> bool {
        matches!(self, Self::PageControl { .. })
    }
}

const fn empty_page_suffix(empty_page: &bool) -> &'static str {
    if *empty_page { ", empty page" } else { "" }
}

/// Result type returned by [`DirectoryConnection`] methods.
///
/// [`DirectoryConnection`]: crate::DirectoryConnection
pub type DirectoryResult<T, E = DirectoryError> = Result<T, E>;

/// Result type returned by search iteration.
pub type SearchResult<T, E = SearchError> = Result<T, E>;
