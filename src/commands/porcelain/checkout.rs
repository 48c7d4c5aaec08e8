use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::snapshot::Snapshot;

impl Repository {
    /// `checkout -- <path>`: restore a file from the current branch tip.
    pub fn checkout_file(&mut self, path: &str) -> Result<()> {
        let head = self.head_commit()?;
        self.restore_file_from(&head, path)
    }

    /// `checkout <commit-prefix> -- <path>`: restore a file from an
    /// arbitrary commit.
    pub fn checkout_file_at(&mut self, commit_prefix: &str, path: &str) -> Result<()> {
        let oid = self.graph().resolve_prefix(commit_prefix)?;
        let commit = self.database().load_commit(&oid)?;
        self.restore_file_from(&commit, path)
    }

    /// `checkout <branch>`: swap the working tree to another branch's tip.
    pub fn checkout_branch(&mut self, name: &str) -> Result<()> {
        let Some(target_oid) = self.refs().read_branch(name)? else {
            return Err(Error::NoSuchBranch);
        };
        if name == self.refs().current_branch()? {
            return Err(Error::CheckoutCurrentBranch);
        }

        let target = self.database().load_commit(&target_oid)?;

        self.stage_file_mut().rehydrate()?;
        let current = self.head_commit()?;
        self.swap_worktree(current.snapshot(), target.snapshot())?;

        self.refs().set_current_branch(name)?;

        let stage = self.stage_file_mut().stage_mut();
        stage.set_baseline(target.snapshot().clone());
        stage.clear();
        self.stage_file().write_updates()
    }

    fn restore_file_from(&self, commit: &Commit, path: &str) -> Result<()> {
        let oid = commit
            .snapshot()
            .get(path)
            .ok_or(Error::FileNotInCommit)?;
        let blob = self.database().load_blob(oid)?;
        self.workspace().write_file(path, blob.content())
    }

    /// Replace the working tree's tracked files with a target snapshot:
    /// delete everything the current snapshot tracks, then write out every
    /// target entry.
    ///
    /// Refuses to run while an untracked file sits at a path the target
    /// would write, so nothing is clobbered silently. The staging index
    /// must be rehydrated before calling. Shared by branch checkout,
    /// reset, and fast-forward merge.
    pub(crate) fn swap_worktree(&self, current: &Snapshot, target: &Snapshot) -> Result<()> {
        for path in self.untracked_paths()? {
            if target.contains(&path) {
                return Err(Error::UntrackedConflict);
            }
        }

        for path in current.paths() {
            self.workspace().delete_file(path)?;
        }

        for (path, oid) in target.iter() {
            let blob = self.database().load_blob(oid)?;
            self.workspace().write_file(path, blob.content())?;
        }

        Ok(())
    }
}
