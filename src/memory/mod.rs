//! An in-memory directory.
//!
//! [`MemoryDirectory`] implements [`DirectoryConnection`] over a list of
//! entries held in memory, with the paging behaviour of a real server:
//! server-issued cookies, base-DN scoping, filter evaluation, attribute
//! selection, and result codes for the usual failures. Faults can be
//! injected to exercise error paths, and round trips are counted.
//!
//! ```
//! use dirsearch::{DirectoryConnection, MemoryDirectory, RawEntry};
//!
//! let mut directory = MemoryDirectory::new();
//! directory.insert(RawEntry::new("dc=example,dc=com"));
//! directory.insert(RawEntry::new("cn=ada,dc=example,dc=com").with_attribute("cn", ["ada"]));
//!
//! directory.set_paged_control(10, true, None)?;
//! let mut handle = directory.search("dc=example,dc=com", "(cn=ada)", &[])?;
//! let page = directory.entries(&mut handle);
//! assert_eq!(page.len(), 1);
//! assert!(directory.paged_control_response(&handle).is_none());
//! # Ok::<_, dirsearch::DirectoryError>(())
//! ```

mod cookie;
use cookie::Cookie;

mod filter;
pub use filter::{Filter, FilterError, MAX_FILTER_DEPTH};

use crate::{
    DirectoryConnection, DirectoryError, DirectoryResult, PageToken, RawEntry, ResultCode,
};
use std::collections::VecDeque;
use tracing::trace;

/// A failure to inject into a [`MemoryDirectory`].
///
/// Faults are queued and consumed in order, each by the first operation it
/// applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The next `set_paged_control` fails with the given code.
    RejectControl(ResultCode),
    /// The next `search` fails with the given code.
    FailSearch(ResultCode),
    /// The next `search` succeeds with no entries and no cookie.
    EmptyPage,
}

/// The paged-results control set for the next search.
#[derive(Debug, Clone, Copy)]
struct PagedControl {
    page_size: u32,
    critical: bool,
    cookie: Option<Cookie>,
}

/// The result of one [`MemoryDirectory`] search round trip.
#[derive(Debug, Default)]
pub struct MemoryHandle {
    entries: Vec<RawEntry>,
    cookie: Option<PageToken>,
}

/// A [`DirectoryConnection`] serving entries held in memory.
///
/// Entries are returned in insertion order. Every entry is considered to
/// carry `objectClass`, so `(objectClass=*)` matches all of them.
#[derive(Debug)]
pub struct MemoryDirectory {
    entries: Vec<RawEntry>,
    paging: bool,
    control: Option<PagedControl>,
    faults: VecDeque<Fault>,
    last_error: ResultCode,
    searches: usize,
    controls: usize,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            paging: true,
            control: None,
            faults: VecDeque::new(),
            last_error: ResultCode::SUCCESS,
            searches: 0,
            controls: 0,
        }
    }

    /// Creates a directory holding the given entries.
    pub fn from_entries(entries: impl IntoIterator<Item = RawEntry>) -> Self {
        entries.into_iter().collect()
    }

    /// Simulates a server without the paged-results control.
    ///
    /// Critical paged searches then fail with
    /// [`ResultCode::UNAVAILABLE_CRITICAL_EXTENSION`], and non-critical ones
    /// receive every matching entry in a single page.
    pub const fn without_paging(mut self) -> Self {
        self.paging = false;
        self
    }

    /// Adds an entry after the existing ones.
    pub fn insert(&mut self, entry: RawEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry with the given DN, returning it.
    pub fn remove(&mut self, dn: &str) -> Option<RawEntry> {
        let index = self.entries.iter().position(|e| e.dn().eq_ignore_ascii_case(dn))?;
        Some(self.entries.remove(index))
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queues a fault.
    pub fn inject(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    /// Number of search round trips attempted, including failed ones.
    pub const fn searches(&self) -> usize {
        self.searches
    }

    /// Number of paged-results controls accepted.
    pub const fn controls(&self) -> usize {
        self.controls
    }

    fn take_fault(&mut self, applies: impl Fn(&Fault) -> bool) -> Option<Fault> {
        if self.faults.front().is_some_and(applies) { self.faults.pop_front() } else { None }
    }

    fn fail<T>(&mut self, code: ResultCode, message: impl Into<String>) -> DirectoryResult<T> {
        self.last_error = code;
        Err(DirectoryError::new(code, message))
    }

    /// Matching entries, in insertion order.
    fn select(&self, base_dn: &str, filter: &Filter) -> Vec<&RawEntry> {
        self.entries
            .iter()
            .filter(|entry| in_scope(entry.dn(), base_dn) && filter.matches(entry))
            .collect()
    }
}

/// True if `dn` is `base` or below it. An empty base is the root.
fn in_scope(dn: &str, base: &str) -> bool {
    if base.is_empty() {
        return true;
    }
    let (dn, base) = (dn.to_ascii_lowercase(), base.to_ascii_lowercase());
    dn == base || dn.strip_suffix(&base).is_some_and(|parent| parent.ends_with(','))
}

impl FromIterator<RawEntry> for MemoryDirectory {
    fn from_iter<T: IntoIterator<Item = RawEntry>>(iter: T) -> Self {
        let mut directory = Self::new();
        directory.extend(iter);
        directory
    }
}

impl Extend<RawEntry> for MemoryDirectory {
    fn extend<T: IntoIterator<Item = RawEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl DirectoryConnection for MemoryDirectory {
    type Handle = MemoryHandle;

    fn set_paged_control(
        &mut self,
        page_size: u32,
        critical: bool,
        token: Option<&PageToken>,
    ) -> DirectoryResult<()> {
        if let Some(Fault::RejectControl(code)) =
            self.take_fault(|f| matches!(f, Fault::RejectControl(_)))
        {
            return self.fail(code, "injected control failure");
        }
        if page_size == 0 {
            return self.fail(ResultCode::PARAM_ERROR, "page size must be positive");
        }
        let cookie = match token {
            Some(token) => match Cookie::decode(token) {
                Some(cookie) => Some(cookie),
                None => return self.fail(ResultCode::PARAM_ERROR, "malformed paged results cookie"),
            },
            None => None,
        };

        self.control = Some(PagedControl { page_size, critical, cookie });
        self.controls += 1;
        self.last_error = ResultCode::SUCCESS;
        Ok(())
    }

    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
    ) -> DirectoryResult<Self::Handle> {
        self.searches += 1;
        // A control applies to one search only.
        let control = self.control.take();

        match self.take_fault(|f| matches!(f, Fault::FailSearch(_) | Fault::EmptyPage)) {
            Some(Fault::FailSearch(code)) => return self.fail(code, "injected search failure"),
            Some(_) => {
                self.last_error = ResultCode::SUCCESS;
                return Ok(MemoryHandle::default());
            }
            None => {}
        }

        let parsed = match Filter::parse(filter) {
            Ok(parsed) => parsed,
            Err(err) => return self.fail(ResultCode::FILTER_ERROR, err.to_string()),
        };
        if !self.entries.iter().any(|e| in_scope(e.dn(), base_dn)) {
            return self.fail(ResultCode::NO_SUCH_OBJECT, format!("no such object: {base_dn}"));
        }

        let fingerprint = Cookie::fingerprint(base_dn, filter);
        let (start, page_size) = match control {
            Some(PagedControl { critical: true, .. }) if !self.paging => {
                return self.fail(
                    ResultCode::UNAVAILABLE_CRITICAL_EXTENSION,
                    "paged results control is not supported",
                );
            }
            Some(PagedControl { page_size, cookie, .. }) if self.paging => match cookie {
                Some(cookie) if cookie.fingerprint != fingerprint => {
                    return self.fail(
                        ResultCode::UNWILLING_TO_PERFORM,
                        "cookie was issued for a different search",
                    );
                }
                Some(cookie) => (cookie.offset, Some(page_size)),
                None => (0, Some(page_size)),
            },
            _ => (0, None),
        };

        let matched = self.select(base_dn, &parsed);
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(matched.len());
        let end = match page_size {
            Some(size) => start.saturating_add(size as usize).min(matched.len()),
            None => matched.len(),
        };

        let entries = matched[start..end]
            .iter()
            .map(|&entry| {
                let mut entry = entry.clone();
                entry.retain_attributes(attributes);
                entry
            })
            .collect();
        let cookie = (page_size.is_some() && end < matched.len())
            .then(|| Cookie { offset: end as u64, fingerprint }.encode());

        trace!(
            target: "dirsearch::memory",
            base_dn,
            filter,
            start,
            end,
            total = matched.len(),
            "served page"
        );

        self.last_error = ResultCode::SUCCESS;
        Ok(MemoryHandle { entries, cookie })
    }

    fn entries(&mut self, handle: &mut Self::Handle) -> Vec<RawEntry> {
        std::mem::take(&mut handle.entries)
    }

    fn paged_control_response(&mut self, handle: &Self::Handle) -> Option<PageToken> {
        handle.cookie.clone()
    }

    fn last_error_code(&self) -> ResultCode {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> MemoryDirectory {
        let mut dir = MemoryDirectory::new();
        dir.insert(RawEntry::new("dc=example,dc=com"));
        for name in ["ada", "grace", "edsger", "barbara", "donald"] {
            dir.insert(
                RawEntry::new(format!("cn={name},ou=people,dc=example,dc=com"))
                    .with_attribute("cn", [name])
                    .with_attribute("mail", [format!("{name}@example.com")]),
            );
        }
        dir.insert(RawEntry::new("cn=admins,ou=groups,dc=example,dc=com"));
        dir
    }

    fn page(
        dir: &mut MemoryDirectory,
        size: u32,
        token: Option<&PageToken>,
    ) -> (Vec<String>, Option<PageToken>) {
        dir.set_paged_control(size, true, token).unwrap();
        let mut handle = dir.search("ou=people,dc=example,dc=com", "(cn=*)", &[]).unwrap();
        let dns = dir.entries(&mut handle).iter().map(|e| e.dn().to_owned()).collect();
        (dns, dir.paged_control_response(&handle))
    }

    #[test]
    fn pages_with_cookies() {
        let mut dir = directory();
        let (first, token) = page(&mut dir, 2, None);
        assert_eq!(first, ["cn=ada,ou=people,dc=example,dc=com", "cn=grace,ou=people,dc=example,dc=com"]);
        let (second, token) = page(&mut dir, 2, token.as_ref());
        assert_eq!(second.len(), 2);
        let (third, token) = page(&mut dir, 2, token.as_ref());
        assert_eq!(third, ["cn=donald,ou=people,dc=example,dc=com"]);
        assert!(token.is_none());
        assert_eq!(dir.searches(), 3);
        assert_eq!(dir.controls(), 3);
    }

    #[test]
    fn scope_is_suffix_on_rdn_boundary() {
        assert!(in_scope("cn=a,dc=example,dc=com", "DC=Example,DC=Com"));
        assert!(in_scope("dc=example,dc=com", "dc=example,dc=com"));
        assert!(!in_scope("cn=a,dc=myexample,dc=com", "example,dc=com"));
        assert!(in_scope("anything", ""));
    }

    #[test]
    fn unknown_base() {
        let mut dir = directory();
        let err = dir.search("dc=nowhere", "(objectClass=*)", &[]).unwrap_err();
        assert_eq!(err.code, ResultCode::NO_SUCH_OBJECT);
        assert_eq!(dir.last_error_code(), ResultCode::NO_SUCH_OBJECT);
    }

    #[test]
    fn bad_filter() {
        let mut dir = directory();
        let err = dir.search("dc=example,dc=com", "(cn=", &[]).unwrap_err();
        assert_eq!(err.code, ResultCode::FILTER_ERROR);
    }

    #[test]
    fn control_validation() {
        let mut dir = directory();
        assert_eq!(dir.set_paged_control(0, true, None).unwrap_err().code, ResultCode::PARAM_ERROR);
        let foreign = PageToken::new(b"xyz".to_vec()).unwrap();
        assert_eq!(
            dir.set_paged_control(10, true, Some(&foreign)).unwrap_err().code,
            ResultCode::PARAM_ERROR
        );
        assert_eq!(dir.controls(), 0);
    }

    #[test]
    fn cookie_bound_to_search() {
        let mut dir = directory();
        let (_, token) = page(&mut dir, 1, None);
        dir.set_paged_control(1, true, token.as_ref()).unwrap();
        let err = dir.search("dc=example,dc=com", "(cn=*)", &[]).unwrap_err();
        assert_eq!(err.code, ResultCode::UNWILLING_TO_PERFORM);
    }

    #[test]
    fn attribute_selection() {
        let mut dir = directory();
        let mut handle =
            dir.search("cn=ada,ou=people,dc=example,dc=com", "(cn=ada)", &["mail".to_owned()]).unwrap();
        let entries = dir.entries(&mut handle);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].attribute("cn").is_none());
        assert!(entries[0].attribute("mail").is_some());
    }

    #[test]
    fn without_paging() {
        let mut dir = directory().without_paging();
        dir.set_paged_control(2, true, None).unwrap();
        let err = dir.search("dc=example,dc=com", "(cn=*)", &[]).unwrap_err();
        assert_eq!(err.code, ResultCode::UNAVAILABLE_CRITICAL_EXTENSION);

        dir.set_paged_control(2, false, None).unwrap();
        let mut handle = dir.search("dc=example,dc=com", "(cn=*)", &[]).unwrap();
        assert_eq!(dir.entries(&mut handle).len(), 5);
        assert!(dir.paged_control_response(&handle).is_none());
    }

    #[test]
    fn faults_apply_in_order() {
        let mut dir = directory();
        dir.inject(Fault::FailSearch(ResultCode::BUSY));
        dir.inject(Fault::RejectControl(ResultCode::PROTOCOL_ERROR));
        dir.inject(Fault::EmptyPage);

        // the search fault is at the front, so the control is accepted
        dir.set_paged_control(2, true, None).unwrap();
        assert_eq!(dir.search("dc=example,dc=com", "(cn=*)", &[]).unwrap_err().code, ResultCode::BUSY);
        assert_eq!(
            dir.set_paged_control(2, true, None).unwrap_err().code,
            ResultCode::PROTOCOL_ERROR
        );
        let mut handle = dir.search("dc=example,dc=com", "(cn=*)", &[]).unwrap();
        assert!(dir.entries(&mut handle).is_empty());
        assert_eq!(dir.searches(), 2);
    }

    #[test]
    fn remove_entry() {
        let mut dir = directory();
        assert!(dir.remove("CN=Ada,ou=people,dc=example,dc=com").is_some());
        assert_eq!(dir.len(), 6);
        assert!(dir.remove("cn=nobody").is_none());
    }
}
