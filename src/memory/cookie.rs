//! Paged-results cookies issued by [`MemoryDirectory`].
//!
//! Layout, big-endian: `offset: u64 | fingerprint: u32`.
//!
//! [`MemoryDirectory`]: crate::MemoryDirectory

use crate::PageToken;
use byteorder::{BigEndian, ByteOrder};
use std::hash::{Hash, Hasher};

const COOKIE_LEN: usize = 12;

/// Position of a paged search, as carried in its cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cookie {
    /// Index of the first entry of the next page.
    pub(crate) offset: u64,
    /// Identifies the search the cookie was issued for.
    pub(crate) fingerprint: u32,
}

impl Cookie {
    pub(crate) fn encode(self) -> PageToken {
        let mut buf = [0u8; COOKIE_LEN];
        BigEndian::write_u64(&mut buf[..8], self.offset);
        BigEndian::write_u32(&mut buf[8..], self.fingerprint);
        PageToken::from_array(buf)
    }

    /// Returns `None` if the token was not issued by a memory directory.
    pub(crate) fn decode(token: &PageToken) -> Option<Self> {
        let bytes = token.as_bytes();
        if bytes.len() != COOKIE_LEN {
            return None;
        }
        Some(Self {
            offset: BigEndian::read_u64(&bytes[..8]),
            fingerprint: BigEndian::read_u32(&bytes[8..]),
        })
    }

    /// Fingerprint of a search: base DN (case-insensitive) and filter.
    pub(crate) fn fingerprint(base_dn: &str, filter: &str) -> u32 {
        let mut hasher = std::hash::DefaultHasher::new();
        base_dn.to_ascii_lowercase().hash(&mut hasher);
        filter.hash(&mut hasher);
        hasher.finish() as u32
    }
}
