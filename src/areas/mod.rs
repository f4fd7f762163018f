//! Persistent repository stores
//!
//! - `database`: content-addressed object store for blobs and commits
//! - `history`: record of the commit graph's shape
//! - `index`: staging area of pending additions and removals
//! - `refs`: branch pointers and the head
//! - `repository`: per-invocation handle tying the stores together
//! - `workspace`: the working copy

pub mod database;
pub mod history;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
