use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};

impl Repository {
    /// Unstage a pending addition and, for tracked files, stage the path
    /// for removal and delete the working copy.
    pub fn rm(&mut self, path: &str) -> Result<()> {
        self.stage_file_mut().rehydrate()?;

        let staged = self.stage_file().stage().additions().contains_key(path);
        let baseline_oid = self.stage_file().stage().baseline().get(path).cloned();

        if !staged && baseline_oid.is_none() {
            return Err(Error::NothingToRemove);
        }

        if staged {
            self.stage_file_mut().stage_mut().unstage_addition(path);
        }

        if let Some(oid) = baseline_oid {
            self.stage_file_mut()
                .stage_mut()
                .stage_removal(path.to_string(), oid);
            self.workspace().delete_file(path)?;
        }

        self.stage_file().write_updates()
    }
}
