#![no_main]

use dirsearch::{Filter, RawEntry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else { return };
    let Ok(filter) = Filter::parse(input) else { return };

    let entry = RawEntry::new("cn=fuzz,dc=example,dc=com")
        .with_attribute("cn", ["fuzz", "Fuzz Target"])
        .with_attribute("mail", ["fuzz@example.com"]);
    let _ = filter.matches(&entry);
});
