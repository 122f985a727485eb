use alloc::collections::TryReserveError;

use thiserror::Error;

/// Why a [`PathBuffer`](crate::PathBuffer) could not be made large enough.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrowError {
    /// The caller passed [`Growth::Refuse`](crate::Growth::Refuse) and the
    /// current capacity is too small.
    #[error("growth refused: {required} bytes required, capacity is {capacity}")]
    Refused {
        /// Capacity the operation needed.
        required: usize,
        /// Capacity the buffer has.
        capacity: usize,
    },
    /// The allocator could not provide the requested storage.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}
