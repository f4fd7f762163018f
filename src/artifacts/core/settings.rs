//! Runtime settings read from the environment
//!
//! - `GITLET_COMMIT_DATE`: fixed timestamp for new commits, RFC 2822 or
//!   `%Y-%m-%d %H:%M:%S %z`; wall-clock time when unset
//! - `NO_PAGER`: when set, `log` and `global-log` never page

use chrono::{DateTime, FixedOffset};
use derive_new::new;

pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";
pub const NO_PAGER_ENV: &str = "NO_PAGER";

#[derive(Debug, Clone, Default, new)]
pub struct Settings {
    commit_date: Option<DateTime<FixedOffset>>,
    no_pager: bool,
}

impl Settings {
    pub fn load_from_env() -> Self {
        let commit_date = std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| match parse_commit_date(&date_str) {
                Some(date) => Some(date),
                None => {
                    tracing::warn!(value = %date_str, "ignoring unparsable {COMMIT_DATE_ENV}");
                    None
                }
            });
        let no_pager = std::env::var_os(NO_PAGER_ENV).is_some();

        Settings {
            commit_date,
            no_pager,
        }
    }

    /// Timestamp for a commit created now
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.commit_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn paging_enabled(&self) -> bool {
        !self.no_pager
    }
}

fn parse_commit_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}
