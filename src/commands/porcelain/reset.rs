use crate::areas::repository::Repository;
use crate::artifacts::errors::Result;

impl Repository {
    /// Move the current branch to an arbitrary commit and check out its
    /// snapshot. The staging index is cleared and rebased onto the target.
    pub fn reset(&mut self, commit_prefix: &str) -> Result<()> {
        let target_oid = self.graph().resolve_prefix(commit_prefix)?;
        let target = self.database().load_commit(&target_oid)?;

        self.stage_file_mut().rehydrate()?;
        let current = self.head_commit()?;
        self.swap_worktree(current.snapshot(), target.snapshot())?;

        let branch = self.refs().current_branch()?;
        self.refs().update_branch(&branch, &target_oid)?;

        let stage = self.stage_file_mut().stage_mut();
        stage.set_baseline(target.snapshot().clone());
        stage.clear();
        self.stage_file().write_updates()
    }
}
