//! Branch and head registry
//!
//! Branches are named pointers into the commit graph, one file per branch
//! under `.gitlet/refs/heads/` holding the commit id. `HEAD` is a symbolic
//! reference naming the checked-out branch:
//!
//! ```text
//! ref: refs/heads/master
//! ```
//!
//! The head's commit is always read through the branch it names, so the
//! head and its branch pointer cannot disagree.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

impl Refs {
    /// Name of the checked-out branch
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .ok_or_else(|| RepositoryError::corrupt("HEAD is not a symbolic reference"))?;

        BranchName::try_parse_sym_ref_name(&SymRefName::new(symref_match[1].to_string()))
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Commit the head points at, read through the current branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch = self.current_branch()?;

        self.read_branch(&branch)?.ok_or_else(|| {
            RepositoryError::corrupt(format!("current branch {branch} has no commit")).into()
        })
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;
        let oid = ObjectId::try_parse(content.trim().to_string()).map_err(|_| {
            RepositoryError::corrupt(format!("branch {name} does not hold a commit id"))
        })?;

        Ok(Some(oid))
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            anyhow::bail!(RepositoryError::BranchAlreadyExists(name.to_string()));
        }

        self.update_ref_file(&self.branch_path(name), oid.as_ref())
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(name)?
            .ok_or_else(|| RepositoryError::BranchNotFound(name.to_string()))?;

        if self.is_current_branch(name)? {
            anyhow::bail!(RepositoryError::CannotDeleteCurrent(name.to_string()));
        }

        let branch_path = self.branch_path(name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// Check out `branch` and point it at `oid`
    pub fn move_head(&self, branch: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch), oid.as_ref())?;
        self.set_head(branch)
    }

    /// Make `branch` the checked-out branch without touching any pointer
    pub fn set_head(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            &format!("ref: {}", branch.to_sym_ref_name().as_ref_path()),
        )
    }

    /// Branch names in sorted order
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative_path = entry
                    .path()
                    .strip_prefix(&heads_path)
                    .with_context(|| format!("ref {:?} is outside refs/heads", entry.path()))?;
                BranchName::try_parse(relative_path.to_string_lossy().replace('\\', "/"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.path
            .join(name.to_sym_ref_name().as_ref_path())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Registry {
        _dir: TempDir,
        refs: Refs,
        root: ObjectId,
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn registry() -> Registry {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        let root = ObjectId::digest_of(b"root");
        refs.move_head(&branch("master"), &root).unwrap();

        Registry {
            _dir: dir,
            refs,
            root,
        }
    }

    #[rstest]
    fn test_head_reads_through_current_branch(registry: Registry) {
        assert_eq!(registry.refs.current_branch().unwrap(), branch("master"));
        assert_eq!(registry.refs.read_head().unwrap(), registry.root);

        let next = ObjectId::digest_of(b"next");
        registry.refs.move_head(&branch("master"), &next).unwrap();
        assert_eq!(registry.refs.read_head().unwrap(), next);
    }

    #[rstest]
    fn test_create_branch_twice_fails(registry: Registry) {
        registry
            .refs
            .create_branch(&branch("feature/x"), &registry.root)
            .unwrap();

        let error = registry
            .refs
            .create_branch(&branch("feature/x"), &registry.root)
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::BranchAlreadyExists(_))
        ));
        assert_eq!(
            registry.refs.list_branches().unwrap(),
            vec![branch("feature/x"), branch("master")]
        );
    }

    #[rstest]
    fn test_delete_branch_rules(registry: Registry) {
        let missing = registry.refs.delete_branch(&branch("ghost")).unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::BranchNotFound(_))
        ));

        let current = registry.refs.delete_branch(&branch("master")).unwrap_err();
        assert!(matches!(
            current.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::CannotDeleteCurrent(_))
        ));

        registry
            .refs
            .create_branch(&branch("topic/nested"), &registry.root)
            .unwrap();
        assert_eq!(
            registry.refs.delete_branch(&branch("topic/nested")).unwrap(),
            registry.root
        );
        assert!(!registry.refs.heads_path().join("topic").exists());
    }
}
