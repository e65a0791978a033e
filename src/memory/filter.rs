//! A subset of RFC 4515 string search filters.
//!
//! Supported: `&`, `|`, `!`, equality, presence, substrings, `>=`, `<=` and
//! `~=` (treated as case-insensitive equality). Values may use `\XX` hex
//! escapes. Extensible matches are rejected. A filter without the outer
//! parentheses, such as `objectClass=*`, is accepted. Nesting deeper than
//! [`MAX_FILTER_DEPTH`] is rejected.

use crate::RawEntry;
use std::cmp::Ordering;

/// Every entry is treated as carrying this attribute, so `(objectClass=*)`
/// matches everything.
const OBJECT_CLASS: &str = "objectClass";

/// Deepest nesting of parenthesized filters accepted by [`Filter::parse`].
pub const MAX_FILTER_DEPTH: usize = 64;

/// A parse failure, with the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter at offset {offset}: {reason}")]
pub struct FilterError {
    /// Byte offset into the filter string.
    pub offset: usize,
    /// What was wrong.
    pub reason: &'static str,
}

/// A parsed search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// All sub-filters match. Empty is absolute true.
    And(Vec<Filter>),
    /// Any sub-filter matches. Empty is absolute false.
    Or(Vec<Filter>),
    /// The sub-filter does not match.
    Not(Box<Filter>),
    /// The attribute is present.
    Present(String),
    /// Some value equals the assertion, ignoring ASCII case.
    Equal(String, Vec<u8>),
    /// Some value sorts at or after the assertion.
    GreaterOrEqual(String, Vec<u8>),
    /// Some value sorts at or before the assertion.
    LessOrEqual(String, Vec<u8>),
    /// Some value matches the substring pattern.
    Substring {
        /// Attribute description.
        attr: String,
        /// Required prefix.
        initial: Option<Vec<u8>>,
        /// Required inner fragments, in order.
        any: Vec<Vec<u8>>,
        /// Required suffix.
        last: Option<Vec<u8>>,
    },
}

impl Filter {
    /// Parses a string filter.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FilterError { offset: 0, reason: "empty filter" });
        }

        let mut parser = Parser { input: trimmed.as_bytes(), pos: 0, depth: 0 };
        let filter = if trimmed.starts_with('(') { parser.filter()? } else { parser.item()? };
        if parser.pos != parser.input.len() {
            return Err(parser.error("trailing characters after filter"));
        }
        Ok(filter)
    }

    /// Evaluates the filter against an entry.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        match self {
            Self::And(filters) => filters.iter().all(|f| f.matches(entry)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(entry)),
            Self::Not(filter) => !filter.matches(entry),
            Self::Present(attr) => {
                attr.eq_ignore_ascii_case(OBJECT_CLASS) || entry.attribute(attr).is_some()
            }
            Self::Equal(attr, value) => any_value(entry, attr, |v| v.eq_ignore_ascii_case(value)),
            Self::GreaterOrEqual(attr, value) => {
                any_value(entry, attr, |v| compare_ignore_case(v, value) != Ordering::Less)
            }
            Self::LessOrEqual(attr, value) => {
                any_value(entry, attr, |v| compare_ignore_case(v, value) != Ordering::Greater)
            }
            Self::Substring { attr, initial, any, last } => any_value(entry, attr, |v| {
                substring_match(v, initial.as_deref(), any, last.as_deref())
            }),
        }
    }
}

fn any_value(entry: &RawEntry, attr: &str, pred: impl Fn(&[u8]) -> bool) -> bool {
    entry.attribute(attr).is_some_and(|a| a.values().iter().any(|v| pred(v)))
}

fn compare_ignore_case(a: &[u8], b: &[u8]) -> Ordering {
    a.iter().map(u8::to_ascii_lowercase).cmp(b.iter().map(u8::to_ascii_lowercase))
}

fn substring_match(value: &[u8], initial: Option<&[u8]>, any: &[Vec<u8>], last: Option<&[u8]>) -> bool {
    let value = value.to_ascii_lowercase();
    let mut rest = value.as_slice();

    if let Some(initial) = initial {
        let initial = initial.to_ascii_lowercase();
        match rest.strip_prefix(initial.as_slice()) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }

    let last = last.map(<[u8]>::to_ascii_lowercase);
    if let Some(last) = &last {
        match rest.strip_suffix(last.as_slice()) {
            Some(head) => rest = head,
            None => return false,
        }
    }

    for fragment in any {
        let fragment = fragment.to_ascii_lowercase();
        match find(rest, &fragment) {
            Some(at) => rest = &rest[at + fragment.len()..],
            None => return false,
        }
    }
    true
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Open filters enclosing the current position.
    depth: usize,
}

impl Parser<'_> {
    const fn error(&self, reason: &'static str) -> FilterError {
        FilterError { offset: self.pos, reason }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), FilterError> {
        if self.peek() != Some(byte) {
            return Err(self.error(reason));
        }
        self.pos += 1;
        Ok(())
    }

    /// `'(' filtercomp ')'`
    fn filter(&mut self) -> Result<Filter, FilterError> {
        if self.depth == MAX_FILTER_DEPTH {
            return Err(self.error("filter nested too deeply"));
        }
        self.depth += 1;
        let filter = self.nested();
        self.depth -= 1;
        filter
    }

    fn nested(&mut self) -> Result<Filter, FilterError> {
        self.expect(b'(', "expected '('")?;
        let filter = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                Filter::And(self.list()?)
            }
            Some(b'|') => {
                self.pos += 1;
                Filter::Or(self.list()?)
            }
            Some(b'!') => {
                self.pos += 1;
                Filter::Not(Box::new(self.filter()?))
            }
            Some(_) => self.item()?,
            None => return Err(self.error("unexpected end of filter")),
        };
        self.expect(b')', "expected ')'")?;
        Ok(filter)
    }

    fn list(&mut self) -> Result<Vec<Filter>, FilterError> {
        let mut filters = Vec::new();
        while self.peek() == Some(b'(') {
            filters.push(self.filter()?);
        }
        Ok(filters)
    }

    /// `attr filtertype value`, stopping before `)` or the end of input.
    fn item(&mut self) -> Result<Filter, FilterError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b';') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected attribute description"));
        }
        let attr = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();

        let op = match (self.peek(), self.input.get(self.pos + 1).copied()) {
            (Some(b'='), _) => Op::Equal,
            (Some(b'>'), Some(b'=')) => Op::GreaterOrEqual,
            (Some(b'<'), Some(b'=')) => Op::LessOrEqual,
            (Some(b'~'), Some(b'=')) => Op::Approx,
            (Some(b':'), _) => return Err(self.error("extensible match is not supported")),
            _ => return Err(self.error("expected filter type")),
        };
        self.pos += if op == Op::Equal { 1 } else { 2 };

        let value_start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b')' => break,
                b'(' => return Err(self.error("unescaped '(' in value")),
                _ => self.pos += 1,
            }
        }
        let raw = &self.input[value_start..self.pos];

        if op != Op::Equal {
            let value = unescape(raw, value_start)?;
            return Ok(match op {
                Op::GreaterOrEqual => Filter::GreaterOrEqual(attr, value),
                Op::LessOrEqual => Filter::LessOrEqual(attr, value),
                _ => Filter::Equal(attr, value),
            });
        }

        if raw == b"*" {
            return Ok(Filter::Present(attr));
        }
        if !raw.contains(&b'*') {
            return Ok(Filter::Equal(attr, unescape(raw, value_start)?));
        }

        let mut parts = Vec::new();
        let mut offset = value_start;
        for part in raw.split(|&b| b == b'*') {
            parts.push(unescape(part, offset)?);
            offset += part.len() + 1;
        }
        // `split` on a value containing '*' yields at least two parts.
        let last = parts.pop().filter(|p| !p.is_empty());
        let mut parts = parts.into_iter();
        let initial = parts.next().filter(|p| !p.is_empty());
        let any: Vec<_> = parts.collect();
        if any.iter().any(Vec::is_empty) {
            return Err(FilterError { offset: value_start, reason: "empty substring fragment" });
        }
        Ok(Filter::Substring { attr, initial, any, last })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
    Approx,
}

fn unescape(raw: &[u8], offset: usize) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'\\' {
            out.push(raw[i]);
            i += 1;
            continue;
        }
        let hex = raw
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or(FilterError { offset: offset + i, reason: "invalid escape sequence" })?;
        out.push(hex);
        i += 3;
    }
    Ok(out)
}
