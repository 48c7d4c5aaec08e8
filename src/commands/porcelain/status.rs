use crate::areas::repository::Repository;
use crate::artifacts::errors::Result;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::report::StatusReport;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// Print the derived working-tree report.
    pub fn status(&mut self) -> Result<()> {
        self.stage_file_mut().rehydrate()?;

        let worktree = self.worktree_view()?;
        let stage = self.stage_file().stage();

        let mut report = StatusReport::classify(
            stage.baseline(),
            stage.additions(),
            stage.removals(),
            &worktree,
        );
        report.branches = self.refs().list_branches()?;
        report.current_branch = self.refs().current_branch()?;

        write!(self.writer(), "{}", report)?;
        Ok(())
    }

    /// The working tree as a path-to-blob-id map: what each file's current
    /// content would hash to if staged right now.
    pub(crate) fn worktree_view(&self) -> Result<BTreeMap<String, ObjectId>> {
        let mut view = BTreeMap::new();

        for path in self.workspace().list_files()? {
            if let Some(content) = self.workspace().read_file(&path)? {
                let blob = Blob::new(path.clone(), content);
                view.insert(path, blob.object_id().clone());
            }
        }

        Ok(view)
    }

    /// Untracked paths as `status` would report them. Callers must have
    /// rehydrated the staging index.
    pub(crate) fn untracked_paths(&self) -> Result<Vec<String>> {
        let worktree = self.worktree_view()?;
        let stage = self.stage_file().stage();

        Ok(StatusReport::classify(
            stage.baseline(),
            stage.additions(),
            stage.removals(),
            &worktree,
        )
        .untracked)
    }
}
