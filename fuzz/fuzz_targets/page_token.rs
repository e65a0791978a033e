#![no_main]

use dirsearch::{DirectoryConnection, MemoryDirectory, PageToken, RawEntry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut directory: MemoryDirectory = (0..8)
        .map(|n| RawEntry::new(format!("cn=user{n},dc=example,dc=com")))
        .collect();

    // Arbitrary cookies must be rejected or served, never panic.
    let token = PageToken::new(data);
    if directory.set_paged_control(3, true, token.as_ref()).is_err() {
        return;
    }
    if let Ok(mut handle) = directory.search("dc=example,dc=com", "(objectClass=*)", &[]) {
        assert!(directory.entries(&mut handle).len() <= 3);
        let _ = directory.paged_control_response(&handle);
    }
});
