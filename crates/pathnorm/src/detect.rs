//! Protocol and drive-marker recognition.

use crate::scan::find_substring;

pub(crate) const PROTOCOL_SEPARATOR: &[u8] = b"://";

/// Offset just past the first `://`, or `0` when the span has no protocol.
///
/// ```rust
/// use pathnorm::detect::protocol_end;
///
/// assert_eq!(protocol_end(b"file://a/b"), 7);
/// assert_eq!(protocol_end(b"/a/b"), 0);
/// ```
#[must_use]
pub fn protocol_end(span: &[u8]) -> usize {
    find_substring(span, PROTOCOL_SEPARATOR, 0).map_or(0, |at| at + PROTOCOL_SEPARATOR.len())
}

/// The scheme preceding `://`, empty when there is none.
#[must_use]
pub fn protocol(span: &[u8]) -> &[u8] {
    match find_substring(span, PROTOCOL_SEPARATOR, 0) {
        Some(at) => &span[..at],
        None => &[],
    }
}

/// The letter of a leading `<letter>:` marker.
///
/// Only ASCII letters form a drive; `"1:"` has none, although
/// [`is_absolute`] still treats it as absolute.
#[must_use]
pub fn drive_letter(span: &[u8]) -> Option<u8> {
    match span {
        [letter, b':', ..] if letter.is_ascii_alphabetic() => Some(*letter),
        _ => None,
    }
}

pub(crate) fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

/// Whether `span` names an absolute location.
///
/// True when a `scheme://` protocol is present, when the first byte is a
/// separator, or when the second byte is a drive colon. `C:relative` counts
/// as absolute; the colon alone is enough.
///
/// ```rust
/// use pathnorm::is_absolute;
///
/// assert!(is_absolute(b"/usr"));
/// assert!(is_absolute(b"\\share"));
/// assert!(is_absolute(b"c:foo"));
/// assert!(is_absolute(b"res://textures"));
/// assert!(!is_absolute(b"usr/lib"));
/// assert!(!is_absolute(b""));
/// ```
#[must_use]
pub fn is_absolute(span: &[u8]) -> bool {
    let Some(&first) = span.first() else {
        return false;
    };
    protocol_end(span) != 0 || is_separator(first) || span.get(1) == Some(&b':')
}
