//! Repository error taxonomy
//!
//! Every expected failure of a repository operation is a [`RepositoryError`]
//! raised through `anyhow`, so callers can recover the variant with
//! `downcast_ref`. Each variant renders as a single line meant for the user
//! and belongs to one [`ErrorKind`].

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of repository failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The repository is in a state where the operation does not apply
    PreconditionFailed,
    /// A branch, commit, object or tracked file is missing
    NotFound,
    /// An untracked working file is in the way
    Conflict,
    /// Persisted state could not be parsed or verified
    Corrupt,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("File name {0:?} cannot be tracked.")]
    UnsupportedPath(PathBuf),

    #[error("No changes added to the commit.")]
    NothingStaged,

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrent(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommit(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge(String),

    #[error("There is an untracked file in the way; delete it or add it first.")]
    UntrackedFileConflict(Vec<PathBuf>),

    #[error("Object {0} does not exist.")]
    ObjectNotFound(ObjectId),

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("Corrupt repository state: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::FileNotFound(_)
            | RepositoryError::BranchNotFound(_)
            | RepositoryError::NoSuchBranch(_)
            | RepositoryError::CommitNotFound(_)
            | RepositoryError::FileNotInCommit(_)
            | RepositoryError::NoCommitWithMessage(_)
            | RepositoryError::ObjectNotFound(_) => ErrorKind::NotFound,
            RepositoryError::UntrackedFileConflict(_) => ErrorKind::Conflict,
            RepositoryError::Corrupt(_) => ErrorKind::Corrupt,
            _ => ErrorKind::PreconditionFailed,
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        RepositoryError::Corrupt(message.into())
    }
}

/// Extract the repository error carried by an `anyhow::Error`, if any
pub fn repository_error(error: &anyhow::Error) -> Option<&RepositoryError> {
    error.downcast_ref::<RepositoryError>()
}
