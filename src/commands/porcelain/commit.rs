use crate::areas::database::StoreKind;
use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Materialize the staged changes as a new commit on the current
    /// branch.
    pub fn commit(&mut self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(Error::EmptyCommitMessage);
        }

        self.stage_file_mut().rehydrate()?;
        let stage = self.stage_file().stage().clone();

        let commit = self.graph().build(
            Some(self.head_oid()?),
            None,
            message.to_string(),
            stage.additions(),
            stage.removals(),
        )?;

        self.finalize_commit(commit)
    }

    /// Persist a built commit and advance the current branch to it.
    ///
    /// Staged blobs are promoted into the permanent store first, and every
    /// blob the snapshot references must exist there before the branch tip
    /// moves. Shared with the merge command.
    pub(crate) fn finalize_commit(&mut self, commit: Commit) -> Result<()> {
        self.database().promote_staged()?;

        for (path, oid) in commit.snapshot().iter() {
            if !self.database().contains(StoreKind::Blobs, oid) {
                return Err(anyhow::anyhow!(
                    "snapshot references blob {} for {} that is not in the object store",
                    oid,
                    path
                )
                .into());
            }
        }

        self.database().store(StoreKind::Commits, &commit)?;

        let branch = self.refs().current_branch()?;
        self.refs().update_branch(&branch, commit.object_id())?;

        let stage = self.stage_file_mut().stage_mut();
        stage.set_baseline(commit.snapshot().clone());
        stage.clear();
        self.stage_file().write_updates()
    }
}
