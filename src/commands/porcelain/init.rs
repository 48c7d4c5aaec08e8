use crate::areas::database::StoreKind;
use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use std::fs;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    /// Create the `.grit` layout, the root commit, and `master` pointing
    /// at it. Prints nothing on success.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        for kind in [StoreKind::Blobs, StoreKind::Commits, StoreKind::Staged] {
            fs::create_dir_all(self.database().store_path(kind))
                .context("unable to create object store directory")?;
        }
        fs::create_dir_all(self.refs().heads_path())
            .context("unable to create refs/heads directory")?;

        let root = Commit::new(
            None,
            None,
            "initial commit".to_string(),
            Commit::epoch_timestamp(),
            Snapshot::new(),
        );
        self.database().store(StoreKind::Commits, &root)?;

        self.refs().create_branch(DEFAULT_BRANCH, root.object_id())?;
        self.refs().set_current_branch(DEFAULT_BRANCH)?;

        self.stage_file().write_updates()?;

        Ok(())
    }
}
