//! Working copy migration
//!
//! Switching the working copy to another commit (branch checkout, reset,
//! fast-forward merge) is planned first and applied second:
//! - Find untracked files the target would overwrite and refuse if any exist
//! - Plan which tracked files go away and which target files get written
//! - Apply deletions before writes
//!
//! Nothing touches the working copy until the conflict check has passed.

pub mod conflict;
pub mod migration;
