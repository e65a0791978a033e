//! Utility functions for benchmarks.
#![allow(dead_code, unreachable_pub)]

use dirsearch::{MemoryDirectory, RawEntry};
use rand::{SeedableRng, prelude::SliceRandom, rngs::StdRng};

/// Container holding the benchmark entries.
pub const BASE: &str = "ou=people,dc=example,dc=com";

/// Matches every benchmark entry.
pub const FILTER: &str = "(objectClass=person)";

/// Generate a benchmark entry.
pub fn get_entry(n: u32) -> RawEntry {
    RawEntry::new(format!("uid=user{n},{BASE}"))
        .with_attribute("objectClass", ["top", "person"])
        .with_attribute("uid", [format!("user{n}")])
        .with_attribute("cn", [format!("User {n}")])
        .with_attribute("mail", [format!("user{n}@example.com")])
}

/// Setup a directory with `num_entries` entries, inserted in a fixed
/// pseudo-random order.
pub fn setup_bench_directory(num_entries: u32) -> MemoryDirectory {
    let mut entries: Vec<RawEntry> = (0..num_entries).map(get_entry).collect();
    entries.shuffle(&mut StdRng::from_seed(Default::default()));
    entries.into_iter().collect()
}
