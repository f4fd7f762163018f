#![allow(dead_code)]

pub mod command;
pub mod file;

/// Fixed timestamp for every commit made through the test helpers
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

pub const CONFLICT_BANNER: &str = "Encountered a merge conflict.";
