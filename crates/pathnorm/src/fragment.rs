//! Substring queries and fragment joins.
//!
//! Queries borrow from their input and never allocate. Both `/` and `\` count
//! as separators, so they work on paths that have not been cleaned yet.

use alloc::vec::Vec;

use bstr::{BString, ByteSlice};

use crate::{
    PathBuffer,
    detect::{is_separator, protocol_end},
    error::GrowError,
    options::Growth,
    scan::{find_char, find_last_of},
};

const SEPARATORS: &[u8] = b"/\\";

/// Everything after the last separator.
///
/// ```rust
/// use pathnorm::fragment::file_name;
///
/// assert_eq!(file_name(b"/a/b.tar.gz"), b"b.tar.gz");
/// assert_eq!(file_name(b"c:\\dir\\"), b"");
/// ```
#[must_use]
pub fn file_name(path: &[u8]) -> &[u8] {
    match find_last_of(path, SEPARATORS) {
        Some(end) => &path[end + 1..],
        None => path,
    }
}

/// The file name up to its first dot. Dot files (`.profile`) keep their
/// whole name.
#[must_use]
pub fn base_file_name(path: &[u8]) -> &[u8] {
    let start = find_last_of(path, SEPARATORS);
    let name_start = start.map_or(0, |sep| sep + 1);
    let end = find_char(path, b'.', start.unwrap_or(0)).filter(|&dot| dot != name_start);
    &path[name_start..end.unwrap_or(path.len())]
}

/// The path up to the last dot of the file name.
#[must_use]
pub fn base_file_name_with_directory(path: &[u8]) -> &[u8] {
    let start = find_last_of(path, SEPARATORS);
    let name_start = start.map_or(0, |sep| sep + 1);
    let end = path
        .rfind_byte(b'.')
        .filter(|&dot| dot != name_start && start.is_none_or(|sep| dot > sep));
    &path[..end.unwrap_or(path.len())]
}

/// Everything after the last dot of the file name, empty when there is none.
#[must_use]
pub fn file_extension(path: &[u8]) -> &[u8] {
    let start = find_last_of(path, SEPARATORS);
    match path.rfind_byte(b'.') {
        Some(dot) if start.is_none_or(|sep| dot > sep) => &path[dot + 1..],
        _ => &[],
    }
}

/// The directory part, without the trailing separator.
///
/// A protocol prefix is dropped and the directory returned rooted, so
/// `"file://a/b"` yields `"/a"`. A path with no separator has no directory.
#[must_use]
pub fn directory_name(path: &[u8]) -> &[u8] {
    match find_last_of(path, SEPARATORS) {
        None => &[],
        Some(0) => b"/",
        Some(end) => {
            let start = protocol_end(path).saturating_sub(1);
            &path[start..end]
        }
    }
}

/// The directory of `path` relative to `root`, empty unless the directory
/// lies strictly below `root`.
///
/// Both sides must carry the same protocol (or none).
///
/// ```rust
/// use pathnorm::fragment::subdirectory_name;
///
/// assert_eq!(subdirectory_name(b"/a/b/c/file.txt", b"/a"), b"b/c");
/// assert_eq!(subdirectory_name(b"file://a/b/f", b"file://a"), b"b");
/// assert_eq!(subdirectory_name(b"/ab/c/f", b"/a"), b"");
/// ```
#[must_use]
pub fn subdirectory_name<'a>(path: &'a [u8], root: &[u8]) -> &'a [u8] {
    let path_proto = protocol_end(path);
    let root_proto = protocol_end(root);
    if path[..path_proto] != root[..root_proto] {
        return &[];
    }

    let directory = directory_name(path);
    let root = &root[root_proto.saturating_sub(1)..];
    if directory.len() <= root.len() || !directory.starts_with(root) {
        return &[];
    }

    match root.last() {
        None => directory,
        Some(&last) if is_separator(last) => &directory[root.len()..],
        Some(_) if is_separator(directory[root.len()]) => &directory[root.len() + 1..],
        Some(_) => &[],
    }
}

/// How a separator is placed between two fragments.
enum Join {
    /// Both sides bring one; drop the second.
    Dedup,
    /// Exactly one side brings one.
    Keep,
    /// Neither side does.
    Insert,
}

fn join_kind(first: &[u8], second: &[u8]) -> Join {
    let trailing = first.last().copied().is_some_and(is_separator);
    let leading = second.first().copied().is_some_and(is_separator);
    match (trailing, leading) {
        (true, true) => Join::Dedup,
        (false, false) => Join::Insert,
        _ => Join::Keep,
    }
}

/// Joins two fragments with exactly one separator between them.
///
/// ```rust
/// use pathnorm::fragment::merge;
///
/// assert_eq!(merge("a/", "/b"), "a/b");
/// assert_eq!(merge("a", "b"), "a/b");
/// assert_eq!(merge("", "b"), "b");
/// ```
pub fn merge(first: impl AsRef<[u8]>, second: impl AsRef<[u8]>) -> BString {
    let (first, second) = (first.as_ref(), second.as_ref());
    if first.is_empty() {
        return BString::from(second);
    }
    if second.is_empty() {
        return BString::from(first);
    }
    let mut out = Vec::with_capacity(first.len() + second.len() + 1);
    out.extend_from_slice(first);
    match join_kind(first, second) {
        Join::Dedup => out.extend_from_slice(&second[1..]),
        Join::Keep => out.extend_from_slice(second),
        Join::Insert => {
            out.push(b'/');
            out.extend_from_slice(second);
        }
    }
    BString::from(out)
}

/// Folds [`merge`] over `fragments` in order.
pub fn merge_all<I>(fragments: I) -> BString
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    fragments
        .into_iter()
        .fold(BString::default(), |acc, fragment| merge(acc, fragment))
}

impl PathBuffer {
    /// Appends `tail` with exactly one separator in between.
    ///
    /// When either side is empty no separator is added, so appending to an
    /// empty buffer keeps a relative fragment relative (`""` + `"a"` gives
    /// `"a"`, not `"/a"`).
    ///
    /// ```rust
    /// use pathnorm::{Growth, PathBuffer};
    ///
    /// let mut path = PathBuffer::new();
    /// path.append("a", Growth::Permit)?;
    /// assert_eq!(path.as_bstr(), "a");
    /// path.append("b", Growth::Permit)?;
    /// assert_eq!(path.as_bstr(), "a/b");
    /// # Ok::<(), pathnorm::GrowError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// When the joined path does not fit and growth is refused (or the
    /// allocation fails); the buffer is then left unchanged.
    pub fn append(&mut self, tail: impl AsRef<[u8]>, growth: Growth) -> Result<(), GrowError> {
        let tail = tail.as_ref();
        let len = self.len();
        let (separator, tail): (&[u8], &[u8]) = if len == 0 || tail.is_empty() {
            (b"", tail)
        } else {
            match join_kind(self.as_bytes(), tail) {
                Join::Dedup => (b"", &tail[1..]),
                Join::Keep => (b"", tail),
                Join::Insert => (b"/", tail),
            }
        };

        let joined = len + separator.len() + tail.len();
        self.make_room(joined, growth)?;
        let slots = self.slots_mut();
        slots[len..len + separator.len()].copy_from_slice(separator);
        slots[len + separator.len()..joined].copy_from_slice(tail);
        self.set_len(joined);
        self.terminate();
        Ok(())
    }

    /// Prepends `base` with exactly one separator in between.
    ///
    /// As with [`append`](Self::append), an empty side adds no separator:
    /// prepending `""` leaves the content unchanged, and prepending onto an
    /// empty buffer yields `base` without a trailing separator.
    ///
    /// # Errors
    ///
    /// As for [`append`](Self::append); the buffer is left unchanged.
    pub fn prepend(&mut self, base: impl AsRef<[u8]>, growth: Growth) -> Result<(), GrowError> {
        let base = base.as_ref();
        let len = self.len();
        let (base, separator): (&[u8], &[u8]) = if len == 0 || base.is_empty() {
            (base, b"")
        } else {
            match join_kind(base, self.as_bytes()) {
                Join::Dedup => (&base[..base.len() - 1], b""),
                Join::Keep => (base, b""),
                Join::Insert => (base, b"/"),
            }
        };

        let shift = base.len() + separator.len();
        self.make_room(len + shift, growth)?;
        let slots = self.slots_mut();
        slots.copy_within(0..len, shift);
        slots[..base.len()].copy_from_slice(base);
        slots[base.len()..shift].copy_from_slice(separator);
        self.set_len(len + shift);
        self.terminate();
        Ok(())
    }

    /// Appends each fragment in order.
    ///
    /// # Errors
    ///
    /// Stops at the first fragment that does not fit; earlier fragments stay
    /// appended.
    pub fn append_all<I>(&mut self, fragments: I, growth: Growth) -> Result<(), GrowError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        fragments
            .into_iter()
            .try_for_each(|fragment| self.append(fragment, growth))
    }

    /// Prepends the fragments so they end up in iteration order before the
    /// current content: `["a", "b"]` onto `"c"` gives `"a/b/c"`.
    ///
    /// # Errors
    ///
    /// Stops at the first fragment (from the back) that does not fit; later
    /// fragments stay prepended.
    pub fn prepend_all<I>(&mut self, fragments: I, growth: Growth) -> Result<(), GrowError>
    where
        I: IntoIterator,
        I::IntoIter: DoubleEndedIterator,
        I::Item: AsRef<[u8]>,
    {
        fragments
            .into_iter()
            .rev()
            .try_for_each(|fragment| self.prepend(fragment, growth))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a/b/c.txt", "c")]
    #[case("a/b/c.tar.gz", "c")]
    #[case("a/b/.profile", ".profile")]
    #[case(".profile", ".profile")]
    #[case("a.d/file", "file")]
    #[case("plain", "plain")]
    #[case("", "")]
    fn base_names(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(base_file_name(path.as_bytes()), expected.as_bytes());
    }

    #[rstest]
    #[case("a/b/c.tar.gz", "a/b/c.tar")]
    #[case("a/b/.profile", "a/b/.profile")]
    #[case("a.d/file", "a.d/file")]
    #[case("file.txt", "file")]
    fn base_names_with_directory(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(
            base_file_name_with_directory(path.as_bytes()),
            expected.as_bytes()
        );
    }

    #[rstest]
    #[case("a/b/c.txt", "txt")]
    #[case("a.d/file", "")]
    #[case("a/.profile", "profile")]
    #[case("noext", "")]
    fn extensions(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(file_extension(path.as_bytes()), expected.as_bytes());
    }

    #[rstest]
    #[case("/a/b/c", "/a/b")]
    #[case("/file", "/")]
    #[case("file", "")]
    #[case("a\\b", "a")]
    #[case("file://a/b/c", "/a/b")]
    #[case("file://a", "")]
    fn directories(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(directory_name(path.as_bytes()), expected.as_bytes());
    }

    #[rstest]
    #[case("/a/b/c/f", "/a/", "b/c")]
    #[case("/a/b/f", "/a/b", "")]
    #[case("/a/b/f", "", "/a/b")]
    #[case("file://a/b/f", "/a", "")]
    #[case("res://a/b/f", "file://a", "")]
    fn subdirectories(#[case] path: &str, #[case] root: &str, #[case] expected: &str) {
        assert_eq!(
            subdirectory_name(path.as_bytes(), root.as_bytes()),
            expected.as_bytes()
        );
    }

    #[test]
    fn append_joins_with_single_separator() {
        let mut buf = PathBuffer::from_bytes("a/");
        buf.append("/b", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a/b");
        buf.append("c", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a/b/c");
        assert!(buf.is_terminated());
    }

    #[test]
    fn append_into_empty_buffer_keeps_fragment_relative() {
        let mut buf = PathBuffer::new();
        buf.append("a", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a");
    }

    #[test]
    fn empty_side_adds_no_separator() {
        let mut buf = PathBuffer::from_bytes("a");
        buf.append("", Growth::Permit).unwrap();
        buf.prepend("", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a");

        let mut buf = PathBuffer::new();
        buf.prepend("base", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "base");
    }

    #[test]
    fn refused_append_leaves_buffer_untouched() {
        let mut buf = PathBuffer::with_capacity("abc", 4);
        let err = buf.append("def", Growth::Refuse).unwrap_err();
        assert_eq!(
            err,
            GrowError::Refused {
                required: 7,
                capacity: 4
            }
        );
        assert_eq!(buf.as_bstr(), "abc");
    }

    #[test]
    fn prepend_joins_with_single_separator() {
        let mut buf = PathBuffer::from_bytes("/c");
        buf.prepend("b/", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "b/c");
        buf.prepend("/a", Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "/a/b/c");
    }

    #[test]
    fn folds_keep_fragment_order() {
        assert_eq!(merge_all(["a", "b/", "/c", "d"]), "a/b/c/d");
        assert_eq!(merge_all(Vec::<&str>::new()), "");

        let mut buf = PathBuffer::from_bytes("c");
        buf.prepend_all(["a", "b"], Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a/b/c");
        buf.append_all(["d", "e"], Growth::Permit).unwrap();
        assert_eq!(buf.as_bstr(), "a/b/c/d/e");
    }
}
