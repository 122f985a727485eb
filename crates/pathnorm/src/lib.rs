//! In-place normalization of path strings.
//!
//! Paths are rewritten inside a caller-owned [`PathBuffer`] of fixed
//! capacity. Mixed separators, redundant slashes, `.` and `..` segments,
//! lowercase drive letters and `scheme://` prefixes are all handled without
//! touching the filesystem. Storage only grows when the caller passes
//! [`Growth::Permit`]; otherwise an operation that would need more room
//! leaves that part of the path as it was.
//!
//! ```rust
//! use pathnorm::{Growth, PathBuffer};
//!
//! let mut path = PathBuffer::with_capacity("c:\\Games\\.\\bin\\..\\save", 64);
//! assert_eq!(path.clean(Growth::Refuse), "C:/Games/save");
//!
//! let mut path = PathBuffer::from_bytes("project/./file");
//! assert_eq!(path.absolute("/home/user", Growth::Permit), "/home/user/project/file");
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod absolute;
mod buffer;
mod clean;
mod error;
mod options;

pub mod detect;
pub mod fragment;
pub mod scan;

#[cfg(test)]
mod tests;

pub use absolute::{WorkingDirectory, absolute};
pub use buffer::PathBuffer;
pub use clean::clean;
pub use detect::is_absolute;
pub use error::GrowError;
pub use options::Growth;
