//! Repository operations
//!
//! Every user-facing operation lives in `porcelain`, one file per verb. Each
//! follows the same cycle: load persisted state, validate every
//! precondition, mutate, persist.

pub mod porcelain;
