//! Staging record format
//!
//! The staging area is persisted as two records sharing one layout:
//! `.gitlet/index` holds the paths staged for addition with their blob ids,
//! `.gitlet/removals` holds the paths staged for removal.
//!
//! ```text
//! Header (12 bytes):
//!   - Signature (4 bytes)
//!   - Version (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Blob id (20 bytes, additions only)
//!   - Path length (2 bytes) followed by the UTF-8 path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! A record whose set is empty is not written at all.

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the record header in bytes
pub const HEADER_SIZE: usize = 12;

/// Signature of the additions record
pub const ADDITIONS_SIGNATURE: &str = "GLAD";

/// Signature of the removals record
pub const REMOVALS_SIGNATURE: &str = "GLRM";

/// Record format version
pub const VERSION: u32 = 1;
