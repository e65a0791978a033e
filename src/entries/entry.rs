use crate::entries::{Attribute, RawEntry};

/// A directory entry yielded by a search.
///
/// `Entry` is a read-only view over a [`RawEntry`]. Attribute lookups ignore
/// ASCII case, as attribute descriptions do in LDAP. Values are returned as
/// raw bytes; interpreting them is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    raw: RawEntry,
}

impl Entry {
    /// The distinguished name of the entry.
    pub fn dn(&self) -> &str {
        self.raw.dn()
    }

    /// Returns true if the entry carries the named attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.raw.attribute(name).is_some()
    }

    /// All values of the named attribute.
    pub fn values(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.raw.attribute(name).map(Attribute::values)
    }

    /// The first value of the named attribute.
    pub fn first_value(&self, name: &str) -> Option<&[u8]> {
        self.values(name)?.first().map(Vec::as_slice)
    }

    /// The first value of the named attribute, if it is valid UTF-8.
    pub fn first_str(&self, name: &str) -> Option<&str> {
        std::str::from_utf8(self.first_value(name)?).ok()
    }

    /// Attribute names, in server order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.raw.attributes().iter().map(Attribute::name)
    }

    /// The underlying raw entry.
    pub const fn raw(&self) -> &RawEntry {
        &self.raw
    }

    /// Consumes the entry, returning the raw record.
    pub fn into_raw(self) -> RawEntry {
        self.raw
    }
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        Self { raw }
    }
}
