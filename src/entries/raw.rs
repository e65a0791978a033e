use smallvec::SmallVec;

/// Values of one attribute. Most attributes are single-valued, so one value
/// is stored inline.
pub type Values = SmallVec<[Vec<u8>; 1]>;

/// Attribute description that requests no attributes at all (RFC 4511,
/// section 4.5.1.8).
pub const NO_ATTRIBUTES: &str = "1.1";

/// Attribute description that requests all user attributes.
pub const ALL_ATTRIBUTES: &str = "*";

/// A named, multi-valued attribute of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Values,
}

impl Attribute {
    /// Creates an attribute from a name and its raw values.
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        Self { name: name.into(), values: values.into_iter().map(Into::into).collect() }
    }

    /// The attribute description, as returned by the server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw attribute values, in server order.
    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// Attribute descriptions compare case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One directory record as returned by a search: a DN and its attributes.
///
/// This is the unparsed form a [`DirectoryConnection`] hands to the search
/// iterator. Callers receive it wrapped in an [`Entry`].
///
/// [`DirectoryConnection`]: crate::DirectoryConnection
/// [`Entry`]: crate::Entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    dn: String,
    attributes: Vec<Attribute>,
}

impl RawEntry {
    /// Creates an entry with no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self { dn: dn.into(), attributes: Vec::new() }
    }

    /// Adds values to the named attribute, creating it if needed.
    pub fn with_attribute<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        self.push_values(name, values);
        self
    }

    /// Adds values to the named attribute, creating it if needed.
    pub fn push_values<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        match self.attributes.iter_mut().find(|attr| attr.is_named(name)) {
            Some(attr) => attr.values.extend(values.into_iter().map(Into::into)),
            None => self.attributes.push(Attribute::new(name, values)),
        }
    }

    /// The distinguished name of the entry.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// All attributes, in server order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Looks up an attribute by name, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.is_named(name))
    }

    /// Keeps only the requested attributes.
    ///
    /// An empty selection or one containing `*` keeps everything, and `1.1`
    /// alone drops every attribute. Unknown names are ignored.
    pub fn retain_attributes(&mut self, selection: &[String]) {
        if selection.is_empty() || selection.iter().any(|name| name == ALL_ATTRIBUTES) {
            return;
        }
        self.attributes.retain(|attr| selection.iter().any(|name| attr.is_named(name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> RawEntry {
        RawEntry::new("cn=ada,dc=example,dc=com")
            .with_attribute("cn", ["ada"])
            .with_attribute("mail", ["ada@example.com", "lovelace@example.com"])
            .with_attribute("objectClass", ["person"])
    }

    #[test]
    fn lookup_ignores_case() {
        let entry = person();
        assert_eq!(entry.attribute("MAIL").unwrap().values().len(), 2);
        assert!(entry.attribute("sn").is_none());
    }

    #[test]
    fn push_values_merges() {
        let mut entry = person();
        entry.push_values("CN", ["augusta"]);
        assert_eq!(entry.attributes().len(), 3);
        assert_eq!(entry.attribute("cn").unwrap().values(), [b"ada".to_vec(), b"augusta".to_vec()]);
    }

    #[test]
    fn retain_selection() {
        let mut entry = person();
        entry.retain_attributes(&["Mail".to_string(), "title".to_string()]);
        assert_eq!(entry.attributes().len(), 1);
        assert_eq!(entry.attributes()[0].name(), "mail");

        let mut entry = person();
        entry.retain_attributes(&[NO_ATTRIBUTES.to_string()]);
        assert!(entry.attributes().is_empty());

        let mut entry = person();
        entry.retain_attributes(&["cn".to_string(), ALL_ATTRIBUTES.to_string()]);
        assert_eq!(entry, person());
    }
}
