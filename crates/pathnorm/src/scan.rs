//! Offset-aware byte searches.
//!
//! Thin wrappers over [`bstr::ByteSlice`] that take a starting offset and
//! report positions relative to the start of the whole haystack, which is
//! what the in-place rewrite loops need.

use bstr::ByteSlice;

/// First occurrence of `needle` starting at or after `from`.
#[must_use]
pub fn find_substring(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .find(needle)
        .map(|offset| offset + from)
}

/// First occurrence of `byte` starting at or after `from`.
#[must_use]
pub fn find_char(haystack: &[u8], byte: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .find_byte(byte)
        .map(|offset| offset + from)
}

/// Last occurrence of `byte` strictly before `before`.
#[must_use]
pub fn find_last_char(haystack: &[u8], byte: u8, before: usize) -> Option<usize> {
    haystack[..before.min(haystack.len())].rfind_byte(byte)
}

/// Last occurrence of any byte in `set`.
#[must_use]
pub fn find_last_of(haystack: &[u8], set: &[u8]) -> Option<usize> {
    haystack.rfind_byteset(set)
}
