//! Working-directory resolution on top of [`clean`](crate::clean()).

use alloc::{borrow::Cow, string::String, vec::Vec};

use bstr::{BStr, BString};

use crate::{
    PathBuffer,
    clean::clean_in_place,
    detect::{drive_letter, is_absolute, protocol_end},
    options::Growth,
    scan::{find_last_char, find_substring},
};

/// Source of the directory relative paths are resolved against.
///
/// The crate never asks the process for its working directory; callers hand
/// one in. Byte and string types implement this directly, so a fixed
/// directory is simply `"/home/user"`.
pub trait WorkingDirectory {
    /// The current working directory, without a trailing separator.
    fn current_working_directory(&self) -> Cow<'_, [u8]>;
}

impl WorkingDirectory for [u8] {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl WorkingDirectory for str {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl WorkingDirectory for BStr {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl WorkingDirectory for BString {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl WorkingDirectory for String {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl WorkingDirectory for Vec<u8> {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<T: WorkingDirectory + ?Sized> WorkingDirectory for &T {
    fn current_working_directory(&self) -> Cow<'_, [u8]> {
        (**self).current_working_directory()
    }
}

impl PathBuffer {
    /// Makes the path absolute and cleans it.
    ///
    /// Relative paths are joined onto `cwd` first. Unlike
    /// [`clean`](Self::clean), the result is fully rooted: every `..` segment
    /// is resolved or clamped at the root, including a trailing one.
    ///
    /// Joining the working directory needs room; with [`Growth::Refuse`] and
    /// too little capacity the path is only cleaned and stays relative.
    ///
    /// ```rust
    /// use pathnorm::{Growth, PathBuffer};
    ///
    /// let mut path = PathBuffer::from_bytes("project/./file");
    /// assert_eq!(path.absolute("/home/user", Growth::Permit), "/home/user/project/file");
    ///
    /// let mut path = PathBuffer::from_bytes("/a/b/..");
    /// assert_eq!(path.absolute("/ignored", Growth::Refuse), "/a");
    /// ```
    pub fn absolute<W>(&mut self, cwd: &W, growth: Growth) -> &BStr
    where
        W: WorkingDirectory + ?Sized,
    {
        absolute_in_place(self, cwd, growth);
        self.as_bstr()
    }
}

/// Resolves `path` against `cwd` into a new byte string, growing as needed.
///
/// ```rust
/// assert_eq!(pathnorm::absolute("../x", "C:\\work\\sub"), "C:/work/x");
/// assert_eq!(pathnorm::absolute("/abs/../path", "/home/user"), "/path");
/// ```
pub fn absolute<W>(path: impl AsRef<[u8]>, cwd: &W) -> BString
where
    W: WorkingDirectory + ?Sized,
{
    let mut buf = PathBuffer::from_bytes(path);
    absolute_in_place(&mut buf, cwd, Growth::Permit);
    buf.into_bstring()
}

fn absolute_in_place<W>(buf: &mut PathBuffer, cwd: &W, growth: Growth)
where
    W: WorkingDirectory + ?Sized,
{
    if !is_absolute(buf.as_bytes()) {
        let dir = cwd.current_working_directory();
        prepend_directory(buf, &dir, growth);
    }

    clean_in_place(buf, growth);
    if !is_absolute(buf.as_bytes()) {
        // working directory could not be joined, nothing to clamp against
        return;
    }

    let mut len = buf.len();
    let proto = protocol_end(buf.as_bytes());
    let root_end = if proto != 0 {
        proto
    } else if drive_letter(buf.as_bytes()).is_some() {
        3
    } else {
        1
    };

    let bytes = buf.slots_mut();
    len = collapse_parents(bytes, len, proto.saturating_sub(1));
    while bytes[..len].ends_with(b"/..") {
        len = match find_last_char(&bytes[..len], b'/', len - 3) {
            Some(sep) if sep >= root_end => sep,
            _ => root_end,
        };
    }

    buf.set_len(len);
    buf.terminate();
}

/// Joins `dir` and a separator in front of the buffer's content.
fn prepend_directory(buf: &mut PathBuffer, dir: &[u8], growth: Growth) {
    let len = buf.len();
    let shift = dir.len() + 1;
    if !buf.reserve_for_splice(len + shift, growth) {
        return;
    }
    let slots = buf.slots_mut();
    slots.copy_within(0..len, shift);
    slots[..dir.len()].copy_from_slice(dir);
    slots[dir.len()] = b'/';
    buf.set_len(len + shift);
}

/// Removes every `/../` from a rooted path. `root` is the offset of the root
/// separator; a reference right after it is dropped, any other one takes the
/// preceding segment with it.
fn collapse_parents(bytes: &mut [u8], mut len: usize, root: usize) -> usize {
    while let Some(up) = find_substring(&bytes[..len], b"/../", root) {
        if up == root {
            bytes.copy_within(root + 4..len, root + 1);
            len -= 3;
            continue;
        }
        // `C:/../x` has no separator before the match
        let last = find_last_char(&bytes[..len], b'/', up).unwrap_or(up);
        bytes.copy_within(up + 3..len, last);
        len -= up + 3 - last;
    }
    len
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const HOME: &str = "/home/user";

    #[rstest]
    #[case("project/./file", "/home/user/project/file")]
    #[case("/abs/../path", "/path")]
    #[case("", "/home/user")]
    #[case(".", "/home/user")]
    #[case("..", "/home")]
    #[case("../..", "/")]
    #[case("../../../../x", "/x")]
    #[case("a/b/..", "/home/user/a")]
    #[case("/..", "/")]
    #[case("/a/..", "/")]
    #[case("\\x\\y", "/x/y")]
    fn resolves_against_home(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(absolute(input, HOME), expected, "absolute({input:?})");
    }

    #[rstest]
    #[case("c:/..", "C:/")]
    #[case("c:/a/..", "C:/")]
    #[case("c:/a/b/..", "C:/a")]
    #[case("file://../a", "file://a")]
    #[case("file://a/..", "file://")]
    #[case("file://..", "file://")]
    #[case("1:a", "/1:a")]
    #[case("1:/..", "/")]
    fn clamps_at_every_root_kind(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(absolute(input, HOME), expected, "absolute({input:?})");
    }

    #[test]
    fn windows_working_directory() {
        assert_eq!(absolute("..\\x", "C:\\work\\sub"), "C:/work/x");
        assert_eq!(absolute("y", "d:"), "D:/y");
    }

    #[test]
    fn working_directory_types() {
        let owned = String::from("/srv");
        assert_eq!(absolute("a", &owned), "/srv/a");
        assert_eq!(absolute("a", b"/srv".as_slice()), "/srv/a");
        assert_eq!(absolute("a", &BString::from("/srv")), "/srv/a");
    }

    #[test]
    fn refused_growth_leaves_path_relative() {
        let mut buf = PathBuffer::with_capacity("a/./b", 8);
        assert_eq!(buf.absolute(HOME, Growth::Refuse), "a/b");
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn preallocated_buffer_needs_no_growth() {
        let mut buf = PathBuffer::with_capacity("a/../b", 32);
        assert_eq!(buf.absolute(HOME, Growth::Refuse), "/home/user/b");
        assert!(buf.is_terminated());
    }

    #[test]
    fn absolute_input_ignores_working_directory() {
        let mut buf = PathBuffer::from_bytes("/x/./y");
        assert_eq!(buf.absolute("/unused", Growth::Refuse), "/x/y");
    }

    #[test]
    fn collapse_without_preceding_separator_anchors_at_match() {
        let mut bytes = b"C:/../x".to_vec();
        let len = collapse_parents(&mut bytes, 7, 0);
        assert_eq!(&bytes[..len], b"C:/x");
    }
}
