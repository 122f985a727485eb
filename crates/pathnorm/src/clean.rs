//! In-place path cleaning.
//!
//! The rewrite runs as a fixed sequence of passes over the bytes following
//! any `scheme://` prefix:
//!
//! 1. backslashes become slashes,
//! 2. `/./` collapses to `/`,
//! 3. `//` collapses to `/`,
//! 4. the dot of a leading `./`, a trailing `/.` and a lone `.` are dropped,
//! 5. the root is anchored (drive letters uppercased, `C:foo` becomes `C:/foo`,
//!    `1:a` becomes `/1:a`),
//! 6. `/../` references are resolved,
//! 7. the slash after a protocol and a trailing slash are stripped.
//!
//! Nothing is allocated unless the root anchoring needs a byte the buffer does
//! not have and the caller permitted growth.

use bstr::{BStr, BString};

use crate::{
    PathBuffer,
    detect::{drive_letter, is_absolute, protocol_end},
    options::Growth,
    scan::{find_last_char, find_substring},
};

const CURRENT_DIR: &[u8] = b"/./";
const DOUBLE_SEPARATOR: &[u8] = b"//";
const PARENT_DIR: &[u8] = b"/../";

/// Offset of the slash that follows a drive marker (`C:/`).
const DRIVE_ROOT: usize = 2;

impl PathBuffer {
    /// Normalizes the path in place and returns the cleaned bytes.
    ///
    /// Separators are unified to `/`, redundant separators and `.` segments
    /// are removed, and `..` segments are resolved against their preceding
    /// segment wherever that does not cross the root. A `scheme://` prefix
    /// is left untouched. Leading `..` segments of a relative path are kept;
    /// in an absolute path they are clamped at the root.
    ///
    /// With [`Growth::Refuse`] and a full buffer the root anchoring splices
    /// (`C:` to `C:/`) are skipped instead of writing past the capacity.
    ///
    /// ```rust
    /// use pathnorm::{Growth, PathBuffer};
    ///
    /// let mut path = PathBuffer::from_bytes("/a/./b//../c/");
    /// assert_eq!(path.clean(Growth::Refuse), "/a/c");
    /// assert!(path.is_terminated());
    /// ```
    pub fn clean(&mut self, growth: Growth) -> &BStr {
        clean_in_place(self, growth);
        self.as_bstr()
    }
}

/// Cleans `path` into a new byte string, growing as needed.
///
/// ```rust
/// assert_eq!(pathnorm::clean("c:foo\\bar"), "C:/foo/bar");
/// assert_eq!(pathnorm::clean("file://a/./b/../c"), "file://a/c");
/// ```
pub fn clean(path: impl AsRef<[u8]>) -> BString {
    let mut buf = PathBuffer::from_bytes(path);
    clean_in_place(&mut buf, Growth::Permit);
    buf.into_bstring()
}

pub(crate) fn clean_in_place(buf: &mut PathBuffer, growth: Growth) {
    let proto = protocol_end(buf.as_bytes());
    let mut len = buf.len() - proto;

    {
        let part = &mut buf.slots_mut()[proto..];
        unify_separators(&mut part[..len]);
        len = collapse(part, len, CURRENT_DIR, 2);
        len = collapse(part, len, DOUBLE_SEPARATOR, 1);
        len = trim_current_dir(part, len);
    }

    let mut absolute = proto != 0 || is_absolute(&buf.slots()[proto..proto + len]);
    let mut root = 0;
    if absolute {
        (len, root) = anchor_root(buf, proto, len, growth);
    }
    len = resolve_parents(&mut buf.slots_mut()[proto..], len, root, absolute);

    if proto != 0 && len > 0 && buf.slots()[proto] == b'/' {
        buf.slots_mut().copy_within(proto + 1..proto + len, proto);
        len -= 1;
    }

    // Dropping a first segment (`a/../c:d`) or the slash after a protocol
    // (`x:///c:`) can expose a root marker; anchor and resolve once more so
    // the result is stable.
    let exposed = &buf.slots()[proto..proto + len];
    if (!absolute && is_absolute(exposed))
        || (root != DRIVE_ROOT && drive_letter(exposed).is_some())
    {
        absolute = true;
        (len, root) = anchor_root(buf, proto, len, growth);
        len = resolve_parents(&mut buf.slots_mut()[proto..], len, root, absolute);
    }

    let part = &buf.slots()[proto..];
    if len > 1 && part[len - 1] == b'/' && !(root == DRIVE_ROOT && len == DRIVE_ROOT + 1) {
        len -= 1;
    }

    buf.set_len(proto + len);
    buf.terminate();
}

fn unify_separators(part: &mut [u8]) {
    for byte in part.iter_mut().filter(|byte| **byte == b'\\') {
        *byte = b'/';
    }
}

/// Repeatedly replaces `pattern` by its leading slash, shifting the tail left
/// by `removed` bytes per match.
fn collapse(part: &mut [u8], mut len: usize, pattern: &[u8], removed: usize) -> usize {
    let mut next = 0;
    while let Some(at) = find_substring(&part[..len], pattern, next) {
        part.copy_within(at + 1 + removed..len, at + 1);
        len -= removed;
        next = at;
    }
    len
}

fn trim_current_dir(part: &mut [u8], mut len: usize) -> usize {
    if &part[..len] == b"." {
        return 0;
    }
    if len > 1 {
        if &part[len - 2..len] == b"/." {
            // keep the slash of a bare "/."
            len = if len == 2 { 1 } else { len - 2 };
        }
        if &part[..len] == b"." {
            len = 0;
        } else if &part[..len] == b"./" {
            part[0] = b'/';
            len = 1;
        } else if part[..len].starts_with(b"./") {
            // only the dot goes; the path is rooted from here on
            part.copy_within(1..len, 0);
            len -= 1;
        }
    }
    len
}

/// Anchors an absolute path's root, returning the new length and the offset
/// the root marker ends at (`2` after a drive letter, `0` otherwise).
fn anchor_root(buf: &mut PathBuffer, proto: usize, len: usize, growth: Growth) -> (usize, usize) {
    if len == 0 {
        if buf.reserve_for_splice(proto + 1, growth) {
            buf.slots_mut()[proto] = b'/';
            return (1, 0);
        }
        return (0, 0);
    }

    if drive_letter(&buf.slots()[proto..proto + len]).is_some() {
        buf.slots_mut()[proto].make_ascii_uppercase();
        if len == DRIVE_ROOT {
            if buf.reserve_for_splice(proto + DRIVE_ROOT + 1, growth) {
                buf.slots_mut()[proto + DRIVE_ROOT] = b'/';
                return (DRIVE_ROOT + 1, DRIVE_ROOT);
            }
        } else if buf.slots()[proto + DRIVE_ROOT] != b'/'
            && buf.reserve_for_splice(proto + len + 1, growth)
        {
            let part = &mut buf.slots_mut()[proto..];
            part.copy_within(DRIVE_ROOT..len, DRIVE_ROOT + 1);
            part[DRIVE_ROOT] = b'/';
            let len = reclean_drive_tail(part, len + 1);
            return (len, DRIVE_ROOT);
        }
        return (len, DRIVE_ROOT);
    }

    // absolute through a non-letter colon (`1:a`); root it with a slash
    if proto == 0
        && buf.slots()[0] != b'/'
        && buf.reserve_for_splice(len + 1, growth)
    {
        let part = buf.slots_mut();
        part.copy_within(0..len, 1);
        part[0] = b'/';
        return (len + 1, 0);
    }

    (len, 0)
}

/// A slash spliced after `C:` can meet a leading `.` segment (`c:./a`,
/// `c:.`); remove what that forms so cleaning stays idempotent.
fn reclean_drive_tail(part: &mut [u8], len: usize) -> usize {
    let len = collapse(part, len, CURRENT_DIR, 2);
    if &part[DRIVE_ROOT..len] == b"/." {
        return DRIVE_ROOT + 1;
    }
    len
}

/// Resolves `/../` references.
///
/// `earliest` is the earliest offset at which a reference may still be
/// resolved. It starts right after the root marker and only moves forward,
/// past references that have nothing left to cancel.
fn resolve_parents(part: &mut [u8], mut len: usize, root: usize, absolute: bool) -> usize {
    let mut earliest = root;
    while let Some(up) = find_substring(&part[..len], PARENT_DIR, earliest) {
        if up == root {
            if absolute {
                // the root swallows it
                part.copy_within(root + 4..len, root + 1);
                len -= 3;
            } else {
                earliest = root + 3;
            }
            continue;
        }

        match find_last_char(&part[..len], b'/', up) {
            None if !absolute && &part[..up] == b".." => earliest = up + 1,
            None if absolute => {
                part.copy_within(up + 3..len, 0);
                len -= up + 3;
            }
            None => {
                part.copy_within(up + 4..len, 0);
                len -= up + 4;
            }
            Some(prev) if prev >= earliest => {
                if !absolute && &part[prev + 1..up] == b".." {
                    earliest = up + 1;
                } else {
                    part.copy_within(up + 3..len, prev);
                    len -= up - prev + 3;
                }
            }
            Some(_) => earliest = up + 1,
        }
    }
    len
}
