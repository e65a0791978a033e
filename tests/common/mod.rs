//! Shared fixtures for integration tests.
#![allow(missing_docs, dead_code)]

use dirsearch::{MemoryDirectory, RawEntry, SearchResult};

/// Base of every fixture directory.
pub const BASE: &str = "dc=example,dc=com";

/// Container holding the fixture people.
pub const PEOPLE: &str = "ou=people,dc=example,dc=com";

/// Matches every person, and nothing else.
pub const PERSON: &str = "(objectClass=person)";

/// DN of the `n`th fixture person.
pub fn person_dn(n: usize) -> String {
    format!("uid=user{n:04},{PEOPLE}")
}

/// A person entry with `uid`, `cn`, `mail` and `objectClass`.
pub fn person(n: usize) -> RawEntry {
    RawEntry::new(person_dn(n))
        .with_attribute("objectClass", ["top", "person"])
        .with_attribute("uid", [format!("user{n:04}")])
        .with_attribute("cn", [format!("User {n}")])
        .with_attribute("mail", [format!("user{n}@example.com")])
}

/// A directory holding the base, the people container, `count` people and
/// one group.
pub fn directory(count: usize) -> MemoryDirectory {
    let mut directory = MemoryDirectory::new();
    directory.insert(RawEntry::new(BASE).with_attribute("objectClass", ["domain"]));
    directory.insert(RawEntry::new(PEOPLE).with_attribute("objectClass", ["organizationalUnit"]));
    directory.extend((0..count).map(person));
    directory.insert(
        RawEntry::new(format!("cn=admins,ou=groups,{BASE}"))
            .with_attribute("objectClass", ["groupOfNames"]),
    );
    directory
}

/// Drains a search, returning the DNs it yielded.
pub fn drain<I>(search: I) -> SearchResult<Vec<String>>
where
    I: Iterator<Item = SearchResult<dirsearch::Entry>>,
{
    search.map(|entry| entry.map(|e| e.dn().to_owned())).collect()
}
