use alloc::vec::Vec;
use core::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::{error::GrowError, options::Growth};

/// Caller-owned, fixed-capacity byte storage that path operations rewrite in
/// place.
///
/// The storage vector's length *is* the capacity: every slot up to
/// [`capacity`](Self::capacity) is addressable, including the one that
/// receives the terminating zero byte, and nothing beyond it ever is. Only
/// [`reserve`](Self::reserve) with [`Growth::Permit`] changes the capacity.
///
/// `len <= capacity` holds at all times.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PathBuffer {
    storage: Vec<u8>,
    len: usize,
}

impl PathBuffer {
    /// An empty buffer with zero capacity. Any write into it needs growth.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            len: 0,
        }
    }

    /// Copies `bytes` into a buffer with one spare slot for the terminator.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        Self::with_capacity(bytes, bytes.len() + 1)
    }

    /// Copies `bytes` into a buffer of exactly `capacity` slots.
    ///
    /// A capacity smaller than the content is raised to the content length.
    pub fn with_capacity(bytes: impl AsRef<[u8]>, capacity: usize) -> Self {
        let bytes = bytes.as_ref();
        let mut storage = Vec::with_capacity(capacity.max(bytes.len()));
        storage.extend_from_slice(bytes);
        storage.resize(capacity.max(bytes.len()), 0);
        Self {
            storage,
            len: bytes.len(),
        }
    }

    /// Bytes in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when no bytes are in use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots available, including the terminator slot.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The bytes in use.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The bytes in use, as a byte string.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.as_bytes().as_bstr()
    }

    /// Consumes the buffer, keeping only the bytes in use.
    #[must_use]
    pub fn into_bstring(mut self) -> BString {
        self.storage.truncate(self.len);
        BString::from(self.storage)
    }

    /// Whether the slot right after the content holds a zero byte.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.storage.get(self.len) == Some(&0)
    }

    /// Makes sure at least `required` slots exist.
    ///
    /// Existing content and length are preserved. With [`Growth::Refuse`]
    /// this only succeeds when the capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// [`GrowError::Refused`] when growth is refused and the buffer is too
    /// small, [`GrowError::Allocation`] when the allocator gives up.
    pub fn reserve(&mut self, required: usize, growth: Growth) -> Result<(), GrowError> {
        let capacity = self.capacity();
        if capacity >= required {
            return Ok(());
        }
        if !growth.is_permitted() {
            return Err(GrowError::Refused { required, capacity });
        }
        self.storage.try_reserve_exact(required - capacity)?;
        self.storage.resize(required, 0);
        tracing::trace!(from = capacity, to = required, "path buffer grown");
        Ok(())
    }

    /// Makes room for `needed` slots. A reallocation also leaves one slot
    /// spare for the terminator.
    pub(crate) fn make_room(&mut self, needed: usize, growth: Growth) -> Result<(), GrowError> {
        let capacity = self.capacity();
        if capacity >= needed {
            return Ok(());
        }
        if !growth.is_permitted() {
            return Err(GrowError::Refused {
                required: needed,
                capacity,
            });
        }
        self.reserve(needed + 1, growth)
    }

    /// [`make_room`](Self::make_room) for the engine's splices: a failure is
    /// logged and reported as `false` so the caller can skip the splice.
    pub(crate) fn reserve_for_splice(&mut self, needed: usize, growth: Growth) -> bool {
        match self.make_room(needed, growth) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "splice skipped, path left partially canonical");
                false
            }
        }
    }

    pub(crate) fn slots(&self) -> &[u8] {
        &self.storage
    }

    /// Every slot, initialized or not by the current content.
    pub(crate) fn slots_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            len <= self.capacity(),
            "Internal error: length {len} past capacity {}",
            self.capacity()
        );
        self.len = len;
    }

    /// Writes the zero terminator when a slot is free for it.
    pub(crate) fn terminate(&mut self) {
        if let Some(slot) = self.storage.get_mut(self.len) {
            *slot = 0;
        }
    }
}

impl fmt::Debug for PathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathBuffer")
            .field("path", &self.as_bstr())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for PathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl AsRef<[u8]> for PathBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<&str> for PathBuffer {
    fn from(path: &str) -> Self {
        Self::from_bytes(path)
    }
}

impl From<&[u8]> for PathBuffer {
    fn from(path: &[u8]) -> Self {
        Self::from_bytes(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_leaves_terminator_slot() {
        let buf = PathBuffer::from_bytes("abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.capacity(), 4);
        assert!(buf.is_terminated());
    }

    #[test]
    fn capacity_never_below_content() {
        let buf = PathBuffer::with_capacity("abcdef", 2);
        assert_eq!(buf.capacity(), 6);
        assert_eq!(buf.as_bytes(), b"abcdef");
        assert!(!buf.is_terminated());
    }

    #[test]
    fn refused_reserve_reports_sizes() {
        let mut buf = PathBuffer::with_capacity("ab", 2);
        assert_eq!(
            buf.reserve(5, Growth::Refuse),
            Err(GrowError::Refused {
                required: 5,
                capacity: 2
            })
        );
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.reserve(2, Growth::Refuse), Ok(()));
    }

    #[test]
    fn permitted_reserve_keeps_content() {
        let mut buf = PathBuffer::with_capacity("ab", 2);
        buf.reserve(8, Growth::Permit).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_bytes(), b"ab");
    }

    #[test]
    fn zero_capacity_requires_growth() {
        let mut buf = PathBuffer::new();
        assert!(!buf.reserve_for_splice(1, Growth::Refuse));
        assert!(buf.reserve_for_splice(1, Growth::Permit));
        assert_eq!(buf.capacity(), 2);
    }

    #[test]
    fn into_bstring_drops_spare_slots() {
        let buf = PathBuffer::with_capacity("a/b", 16);
        assert_eq!(buf.into_bstring(), "a/b");
    }
}
