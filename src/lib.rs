//! A single-user, local, content-addressable version control system
//!
//! - `areas`: persistent stores and the repository handle
//! - `artifacts`: data structures and algorithms (objects, commit graph, merge engine)
//! - `commands`: one operation per file, each an `impl Repository` block
//! - `error`: the error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod error;
