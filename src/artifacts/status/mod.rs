//! Working tree status
//!
//! - `file_change`: how a working file differs from what would be committed
//! - `status_info`: the collected report and its rendering

pub mod file_change;
pub mod status_info;
