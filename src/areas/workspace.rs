use crate::areas::database::BlobStore;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".gitlet"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file under the working directory, relative to it, in path order
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path(), &self.path))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path, root: &Path) -> bool {
        path.strip_prefix(root)
            .ok()
            .and_then(|relative| relative.components().next())
            .is_some_and(|component| {
                IGNORED_PATHS.contains(&component.as_os_str().to_string_lossy().as_ref())
            })
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.path.join(file_path))
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directories for: {:?}", file_path)
            })?;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path).with_context(|| {
                format!("Failed to remove existing directory: {:?}", file_path)
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file if present, then prune parent directories left empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(&path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Failed to remove empty directory: {:?}", parent)
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions go first so a file can replace a directory that only held deleted files.
    pub fn apply_migration(
        &self,
        migration: &Migration,
        blobs: &impl BlobStore,
    ) -> anyhow::Result<()> {
        for file_path in migration.deletions() {
            self.remove_file(file_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let content = blobs.get(oid)?;
            self.write_file(file_path, &content)?;
        }

        Ok(())
    }
}
