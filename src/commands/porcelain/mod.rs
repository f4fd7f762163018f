//! User-facing operations
//!
//! - `init`: create an empty repository with its initial commit
//! - `add`: stage a file
//! - `commit`: snapshot the staging area
//! - `rm`: stage a removal
//! - `branch`: create and delete branches
//! - `checkout`: switch branches or restore files
//! - `log`: first-parent history and every commit ever made
//! - `find`: commits by message
//! - `status`: branches, staging area and working copy
//! - `reset`: move the current branch to a commit
//! - `merge`: reconcile another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
