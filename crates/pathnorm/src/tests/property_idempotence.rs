use alloc::vec::Vec;

use bstr::ByteSlice;
use quickcheck::QuickCheck;

use super::{arbitrary::PathInput, quickcheck_tests};
use crate::{PathBuffer, absolute, clean, detect::protocol_end, is_absolute};

/// Property: cleaning an already clean path changes nothing.
#[test]
fn clean_is_idempotent_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(path: PathInput) -> bool {
        let once = clean(&path.0);
        clean(&once) == once
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(PathInput) -> bool);
}

/// Property: arbitrary bytes (not only path-shaped text) clean idempotently.
#[test]
fn clean_is_idempotent_on_raw_bytes_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let once = clean(&bytes);
        clean(&once) == once
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: past its protocol, an absolute result contains no `/../` and
/// does not end in `/..`.
#[test]
fn absolute_leaves_no_parent_references_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(path: PathInput) -> bool {
        let resolved = absolute(&path.0, "/home/user");
        let rooted = &resolved[protocol_end(&resolved).saturating_sub(1)..];
        is_absolute(&resolved) && !rooted.contains_str("/../") && !rooted.ends_with(b"/..")
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(PathInput) -> bool);
}

/// Property: the in-place method and the allocating function agree.
#[test]
fn buffer_and_function_agree_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(path: PathInput) -> bool {
        let mut buf = PathBuffer::from_bytes(&path.0);
        buf.clean(crate::Growth::Permit) == clean(&path.0)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(PathInput) -> bool);
}
