//! Stored objects
//!
//! Everything the repository persists by content lives in the object store
//! as one of two object kinds:
//!
//! - **Blob**: raw file content
//! - **Commit**: an immutable snapshot of tracked paths plus metadata
//!
//! Both share the framed on-disk format `<type> <size>\0<content>`, and the
//! object id is the SHA-1 of that framed form.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest prefix accepted when resolving an abbreviated commit id
pub const MIN_ABBREVIATED_ID_LENGTH: usize = 4;
