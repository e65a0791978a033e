//! Property-based tests for paging arithmetic and parser robustness.
//!
//! The paging properties check ordering, completeness and round-trip counts
//! for arbitrary result sizes and page sizes. The robustness properties only
//! require that arbitrary input does not panic; errors are acceptable.
#![allow(missing_docs)]
mod common;

use common::{PEOPLE, PERSON, directory, drain, person_dn};
use dirsearch::{DirectoryConnection, Filter, MemoryDirectory, PageToken, PagedSearch, RawEntry};
use proptest::prelude::*;

/// Strategy for arbitrary byte strings (0 to 64 bytes).
fn arb_small_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Strategy for filter-shaped strings.
fn arb_filter() -> impl Strategy<Value = String> {
    "[()&|!=*~<>a-z0-9\\\\ ]{0,48}"
}

// =============================================================================
// Paging
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every entry is yielded once, in server order, in ceil(N/P) fetches.
    #[test]
    fn yields_all_entries_in_order(count in 1usize..200, page_size in 1u32..50) {
        let mut dir = directory(count);
        let mut search = PagedSearch::new(&mut dir, PEOPLE, PERSON, None, Some(page_size));

        let dns = drain(&mut search).unwrap();
        prop_assert_eq!(dns, (0..count).map(person_dn).collect::<Vec<_>>());

        let pages = count.div_ceil(page_size as usize);
        prop_assert_eq!(search.connection().searches(), pages);
        prop_assert_eq!(search.page_index(), pages - 1);

        // exhausted searches stay exhausted without further fetches
        prop_assert!(search.next_entry().unwrap().is_none());
        prop_assert_eq!(search.connection().searches(), pages);
    }

    /// A reset followed by a full iteration reproduces the first one.
    #[test]
    fn reset_reproduces(count in 1usize..100, page_size in 1u32..20, taken in 0usize..120) {
        let mut dir = directory(count);
        let mut search = PagedSearch::new(&mut dir, PEOPLE, PERSON, None, Some(page_size));

        for _ in 0..taken.min(count) {
            search.next_entry().unwrap();
        }
        search.reset();
        prop_assert_eq!(drain(&mut search).unwrap(), (0..count).map(person_dn).collect::<Vec<_>>());
    }
}

// =============================================================================
// Robustness
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Parsing and evaluating arbitrary filters does not panic.
    #[test]
    fn arbitrary_filter(filter in arb_filter()) {
        if let Ok(parsed) = Filter::parse(&filter) {
            let _ = parsed.matches(&RawEntry::new("cn=x").with_attribute("cn", ["x"]));
        }
    }

    /// Searching with an arbitrary filter does not panic.
    #[test]
    fn arbitrary_search_filter(filter in arb_filter()) {
        let mut dir = directory(3);
        let _ = PagedSearch::new(&mut dir, PEOPLE, filter, None, Some(2)).take(5).count();
    }

    /// Arbitrary cookies are rejected or served, never a panic.
    #[test]
    fn arbitrary_cookie(cookie in arb_small_bytes()) {
        let mut dir: MemoryDirectory = directory(5);
        let token = PageToken::new(cookie);
        if dir.set_paged_control(2, true, token.as_ref()).is_ok() {
            if let Ok(mut handle) = dir.search(PEOPLE, PERSON, &[]) {
                prop_assert!(dir.entries(&mut handle).len() <= 2);
            }
        }
    }
}
