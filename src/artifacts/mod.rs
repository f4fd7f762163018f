//! Data structures and algorithms
//!
//! - `branch`: branch name validation and symbolic ref names
//! - `checkout`: working copy migration and untracked-file conflicts
//! - `core`: shared utilities (pager writer, settings)
//! - `graph`: the commit DAG arena
//! - `index`: staging record codec and checksum
//! - `log`: first-parent history walk
//! - `merge`: merge-base finders, three-way resolution, conflict markers
//! - `objects`: object ids, blobs, commits
//! - `status`: working tree status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod graph;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
