use crate::areas::database::StoreKind;
use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};
use crate::artifacts::merge::plan::{classify, conflict_text, MergePlan};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Three-way merge of another branch into the current one.
    ///
    /// After the precondition and fast-path checks, every path is
    /// classified against the split point; the untracked-file check runs
    /// before any working-tree or staging mutation, so an abort leaves the
    /// pre-merge state intact. A conflict-free merge commits immediately
    /// with two parents; conflicts are materialized into the working tree
    /// and left staged for the user to resolve and commit.
    pub fn merge(&mut self, target_branch: &str) -> Result<()> {
        self.stage_file_mut().rehydrate()?;
        if !self.stage_file().stage().is_clean() {
            return Err(Error::UncommittedChanges);
        }

        let Some(given_oid) = self.refs().read_branch(target_branch)? else {
            return Err(Error::BranchNotFound);
        };
        let current_branch = self.refs().current_branch()?;
        if target_branch == current_branch {
            return Err(Error::SelfMerge);
        }

        let head_oid = self.head_oid()?;
        let split_oid = self.graph().split_point(&head_oid, &given_oid)?;

        if split_oid == given_oid {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(());
        }

        let given = self.database().load_commit(&given_oid)?;
        if split_oid == head_oid {
            return self.fast_forward(&current_branch, &given);
        }

        let current = self.database().load_commit(&head_oid)?;
        let split = self.database().load_commit(&split_oid)?;
        let plan = classify(current.snapshot(), given.snapshot(), split.snapshot());

        let untracked = self.untracked_paths()?;
        if untracked
            .iter()
            .any(|path| plan.touched_paths().any(|touched| touched == path))
        {
            return Err(Error::UntrackedConflict);
        }

        self.apply_plan(&plan, &current, &given)?;

        if plan.has_conflicts() {
            self.stage_file().write_updates()?;
            writeln!(self.writer(), "Encountered a merge conflict.")?;
            return Ok(());
        }

        let stage = self.stage_file().stage().clone();
        let commit = self.graph().build(
            Some(head_oid),
            Some(given_oid),
            format!("Merged {} into {}.", target_branch, current_branch),
            stage.additions(),
            stage.removals(),
        )?;
        self.finalize_commit(commit)
    }

    /// The current tip is the split point: move the branch pointer to the
    /// given tip without creating a commit.
    fn fast_forward(&mut self, current_branch: &str, given: &Commit) -> Result<()> {
        let current = self.head_commit()?;
        self.swap_worktree(current.snapshot(), given.snapshot())?;
        self.refs().update_branch(current_branch, given.object_id())?;

        let stage = self.stage_file_mut().stage_mut();
        stage.set_baseline(given.snapshot().clone());
        stage.clear();
        self.stage_file().write_updates()?;

        writeln!(self.writer(), "Current branch fast-forwarded.")?;
        Ok(())
    }

    fn apply_plan(&mut self, plan: &MergePlan, current: &Commit, given: &Commit) -> Result<()> {
        for (path, oid) in &plan.additions {
            let blob = self.database().load_blob(oid)?;
            self.workspace().write_file(path, blob.content())?;
            self.stage_file_mut()
                .stage_mut()
                .stage_addition(path.clone(), oid.clone());
        }

        for (path, oid) in &plan.removals {
            self.workspace().delete_file(path)?;
            self.stage_file_mut()
                .stage_mut()
                .stage_removal(path.clone(), oid.clone());
        }

        for path in &plan.conflicts {
            let current_content = self.blob_content(current.snapshot().get(path))?;
            let given_content = self.blob_content(given.snapshot().get(path))?;
            let text = conflict_text(current_content.as_ref(), given_content.as_ref());

            self.workspace().write_file(path, &text)?;

            let blob = Blob::new(path.clone(), text);
            self.database().store(StoreKind::Staged, &blob)?;
            self.stage_file_mut()
                .stage_mut()
                .stage_addition(path.clone(), blob.object_id().clone());
        }

        Ok(())
    }

    fn blob_content(&self, oid: Option<&ObjectId>) -> Result<Option<Bytes>> {
        match oid {
            Some(oid) => Ok(Some(self.database().load_blob(oid)?.content().clone())),
            None => Ok(None),
        }
    }
}
