//! Repository context object.
//!
//! Bundles the four stateful collaborators (object store, working tree,
//! branch table, staging index) for one repository rooted at a working
//! directory. Every command receives this context explicitly; there is no
//! process-wide state.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::stage::StageFile;
use crate::areas::workspace::Workspace;
use crate::artifacts::errors::Result;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

pub const GRIT_DIR: &str = ".grit";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    stage_file: StageFile,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = Path::new(path)
            .canonicalize()
            .with_context(|| format!("unable to resolve repository path {}", path))?;

        let grit_path = path.join(GRIT_DIR);
        let database = Database::new(grit_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(grit_path.clone().into_boxed_path());
        let stage_file = StageFile::new(grit_path.join("index").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
            stage_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn grit_path(&self) -> std::path::PathBuf {
        self.path.join(GRIT_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.grit_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
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

    pub fn stage_file(&self) -> &StageFile {
        &self.stage_file
    }

    pub fn stage_file_mut(&mut self) -> &mut StageFile {
        &mut self.stage_file
    }

    pub fn graph(&'_ self) -> CommitGraph<'_> {
        CommitGraph::new(&self.database)
    }

    /// Tip commit id of the current branch.
    pub fn head_oid(&self) -> Result<ObjectId> {
        let branch = self.refs.current_branch()?;
        self.refs
            .read_branch(&branch)?
            .ok_or_else(|| anyhow::anyhow!("current branch {} has no tip commit", branch).into())
    }

    /// Tip commit of the current branch.
    pub fn head_commit(&self) -> Result<Commit> {
        self.database.load_commit(&self.head_oid()?)
    }
}
