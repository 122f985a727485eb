/// Whether an operation may replace the buffer's storage with a larger one.
///
/// Every rewrite in this crate happens inside the bytes the caller already
/// handed over. A few splices (the root slash, the slash after a drive
/// marker, a prepended working directory) need one or more extra bytes; those
/// are only written when the capacity is already there or when growth is
/// permitted.
///
/// # Examples
///
/// ```rust
/// use pathnorm::{Growth, PathBuffer};
///
/// // Exactly two bytes of capacity: no room for the slash after the drive.
/// let mut path = PathBuffer::with_capacity("c:", 2);
/// assert_eq!(path.clean(Growth::Refuse), "C:");
///
/// let mut path = PathBuffer::with_capacity("c:", 2);
/// assert_eq!(path.clean(Growth::Permit), "C:/");
/// ```
///
/// # Default
///
/// `Growth::Refuse`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Growth {
    /// Never allocate. Splices that do not fit are skipped and the result
    /// may be less than fully canonical.
    #[default]
    Refuse,
    /// Reallocate the storage when a splice needs more room.
    Permit,
}

impl Growth {
    /// `true` for [`Growth::Permit`].
    #[must_use]
    pub const fn is_permitted(self) -> bool {
        matches!(self, Growth::Permit)
    }
}

impl From<bool> for Growth {
    fn from(permitted: bool) -> Self {
        if permitted {
            Growth::Permit
        } else {
            Growth::Refuse
        }
    }
}
