//! Opaque continuation tokens for paged searches.

use core::fmt;

/// A server-issued continuation token (the paged-results "cookie").
///
/// The token is an uninterpreted byte blob, meaningful only to the
/// [`DirectoryConnection`] that issued it. It is passed back verbatim on
/// the next request and never inspected by the search iterator.
///
/// A token is never empty: servers signal the end of a paged result set
/// with an empty cookie, which [`PageToken::new`] maps to `None`. This
/// keeps "no token" and "empty token" from being two different states.
///
/// [`DirectoryConnection`]: crate::DirectoryConnection
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PageToken(Box<[u8]>);

impl PageToken {
    /// Wraps the given cookie bytes. Returns `None` for an empty cookie.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() { None } else { Some(Self(bytes.into_boxed_slice())) }
    }

    /// Wraps a fixed-size, non-empty cookie.
    pub(crate) fn from_array<const N: usize>(bytes: [u8; N]) -> Self {
        const { assert!(N > 0, "page tokens are never empty") };
        Self(Box::new(bytes))
    }

    /// Returns the raw cookie bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the token, returning the raw cookie bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

impl AsRef<[u8]> for PageToken {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Cookies are opaque and may be large, only the length is printed.
impl fmt::Debug for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageToken({} bytes)", self.0.len())
    }
}
