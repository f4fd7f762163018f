//! Commit object
//!
//! A commit is an immutable, fully materialized snapshot: every tracked path
//! mapped to the id of its blob, plus the message, the creation time and the
//! branch that was checked out when it was made. Parent links are not part
//! of the object; the commit graph record keeps them.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! branch <label>
//! date <rfc3339 timestamp with milliseconds>
//! blob <blob-sha> <path>
//! blob <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! Blob lines are written in path order so the same snapshot always
//! serializes to the same bytes.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::RepositoryError;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Tracked path to blob id, ordered by path
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

/// Message of the root commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    message: String,
    timestamp: DateTime<FixedOffset>,
    blobs: Snapshot,
    branch_label: String,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        blobs: Snapshot,
        branch_label: String,
    ) -> Self {
        Commit {
            message,
            timestamp,
            blobs,
            branch_label,
        }
    }

    /// The synthetic root commit: empty snapshot at the Unix epoch
    pub fn initial() -> Self {
        Commit::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
            Snapshot::new(),
            DEFAULT_BRANCH.to_string(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn blobs(&self) -> &Snapshot {
        &self.blobs
    }

    pub fn blob(&self, path: &Path) -> Option<&ObjectId> {
        self.blobs.get(path)
    }

    pub fn tracks(&self, path: &Path) -> bool {
        self.blobs.contains_key(path)
    }

    pub fn branch_label(&self) -> &str {
        &self.branch_label
    }

    /// Same commit one millisecond later
    pub fn advanced_by_one_millisecond(&self) -> Self {
        Commit {
            timestamp: self.timestamp + chrono::Duration::milliseconds(1),
            ..self.clone()
        }
    }

    /// Format timestamp in human-readable form, e.g. `Thu Jan 1 00:00:00 1970 +0000`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

fn corrupt(detail: &str) -> anyhow::Error {
    RepositoryError::corrupt(format!("invalid commit object: {detail}")).into()
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("branch {}", self.branch_label));
        object_content.push(format!(
            "date {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false)
        ));
        for (path, oid) in &self.blobs {
            object_content.push(format!("blob {} {}", oid, path.display()));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        frame(self.object_type(), object_content.join("\n").as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| corrupt("content is not valid UTF-8"))?;

        let (header, message) = content
            .split_once("\n\n")
            .ok_or_else(|| corrupt("missing message separator"))?;
        let mut lines = header.lines();

        let branch_label = lines
            .next()
            .and_then(|line| line.strip_prefix("branch "))
            .ok_or_else(|| corrupt("missing branch line"))?
            .to_string();

        let timestamp = lines
            .next()
            .and_then(|line| line.strip_prefix("date "))
            .ok_or_else(|| corrupt("missing date line"))?;
        let timestamp =
            DateTime::parse_from_rfc3339(timestamp).map_err(|_| corrupt("invalid date line"))?;

        let mut blobs = Snapshot::new();
        for line in lines {
            let (oid, path) = line
                .strip_prefix("blob ")
                .and_then(|entry| entry.split_once(' '))
                .ok_or_else(|| corrupt("invalid blob line"))?;
            let oid =
                ObjectId::try_parse(oid.to_string()).map_err(|_| corrupt("invalid blob id"))?;
            blobs.insert(PathBuf::from(path), oid);
        }

        Ok(Self::new(
            message.to_string(),
            timestamp,
            blobs,
            branch_label,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("branch {}", self.branch_label));
        lines.push(format!("date {}", self.readable_timestamp()));
        for (path, oid) in &self.blobs {
            lines.push(format!("blob {} {}", oid, path.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
