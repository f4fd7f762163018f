use crate::areas::database::Database;
use crate::areas::history::History;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::ensure_nothing_in_the_way;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::settings::Settings;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::graph::commit_node::CommitNode;
use crate::artifacts::objects::commit::{Commit, Snapshot};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

pub const METADATA_DIR: &str = ".gitlet";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    history: History,
    settings: Settings,
}

impl Repository {
    pub fn new(
        path: &str,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create repository directory {:?}", path))?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            index: RefCell::new(Index::new(metadata_path.clone().into_boxed_path())),
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(metadata_path.clone().into_boxed_path()),
            history: History::new(metadata_path.join("graph").into_boxed_path()),
            path: path.into_boxed_path(),
            settings,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.history.exists()
    }

    /// Load the commit graph and the staging area, failing outside a repository
    pub fn load_graph(&self) -> anyhow::Result<CommitGraph> {
        if !self.is_initialized() {
            anyhow::bail!(RepositoryError::NotInitialized);
        }

        self.index().rehydrate()?;
        self.history.load(&self.database)
    }

    pub fn head_node<'g>(&self, graph: &'g CommitGraph) -> anyhow::Result<&'g CommitNode> {
        let head = self.refs.read_head()?;

        graph.get(&head).ok_or_else(|| {
            RepositoryError::corrupt(format!("head commit {head} is not in the commit graph"))
                .into()
        })
    }

    /// Persist `commit` as a child of `parents` and return its id
    ///
    /// A commit whose id is already taken gets its timestamp advanced one
    /// millisecond at a time until the id is fresh.
    pub fn record_commit(
        &self,
        graph: &mut CommitGraph,
        parents: &[ObjectId],
        mut commit: Commit,
    ) -> anyhow::Result<ObjectId> {
        while graph.contains(&commit.object_id()?) {
            commit = commit.advanced_by_one_millisecond();
        }

        let commit_id = self.database.store(&commit)?;
        graph.create_commit(parents, commit)?;
        self.history.save(graph)?;

        tracing::debug!(commit = %commit_id, ?parents, "recorded commit");

        Ok(commit_id)
    }

    /// Id each working file would get if it were added now
    pub fn workspace_snapshot(&self) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        self.workspace
            .list_files()?
            .into_iter()
            .map(|file| {
                let oid = self.workspace.parse_blob(&file)?.object_id()?;
                Ok((file, oid))
            })
            .collect()
    }

    /// Rewrite the working copy from `from` to `to`
    ///
    /// Fails with `UntrackedFileConflict` before touching any file when an
    /// untracked file would be overwritten.
    pub fn switch_working_copy(&self, from: &Snapshot, to: &Snapshot) -> anyhow::Result<()> {
        self.ensure_no_untracked_in_the_way(from, to)?;

        let migration = Migration::plan(from, to);
        tracing::debug!(
            deletions = migration.deletions().len(),
            writes = migration.writes().len(),
            "migrating working copy"
        );

        self.workspace.apply_migration(&migration, &self.database)
    }

    pub fn ensure_no_untracked_in_the_way(
        &self,
        current: &Snapshot,
        target: &Snapshot,
    ) -> anyhow::Result<()> {
        let workspace_files = self.workspace.list_files()?;

        ensure_nothing_in_the_way(&workspace_files, current, &self.index(), target)
    }

    /// Path of `file` relative to the repository root
    ///
    /// `.` components are dropped; paths escaping the root or pointing into
    /// the metadata directory do not name a trackable file. Names holding
    /// control characters are refused since commit records are line based.
    pub fn relative_path(&self, file: &str) -> anyhow::Result<PathBuf> {
        let path = Path::new(file);
        let path = match path.is_absolute() {
            true => path
                .strip_prefix(&self.path)
                .map_err(|_| RepositoryError::FileNotFound(path.to_path_buf()))?,
            false => path,
        };

        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(name) => relative.push(name),
                _ => anyhow::bail!(RepositoryError::FileNotFound(PathBuf::from(file))),
            }
        }

        if relative.as_os_str().is_empty() || relative.starts_with(METADATA_DIR) {
            anyhow::bail!(RepositoryError::FileNotFound(PathBuf::from(file)));
        }
        if relative
            .to_str()
            .is_none_or(|name| name.chars().any(char::is_control))
        {
            anyhow::bail!(RepositoryError::UnsupportedPath(relative));
        }

        Ok(relative)
    }
}
