use crate::areas::database::StoreKind;
use crate::areas::repository::Repository;
use crate::artifacts::errors::Result;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Stage a working file for the next commit.
    ///
    /// A file staged for removal is recovered instead: the removal is
    /// dropped, the working file is restored from its baseline blob and
    /// the path is re-staged under the baseline id. Re-adding a tracked
    /// file whose content matches the baseline clears any stale staged
    /// addition. Adding an absent path changes nothing.
    pub fn add(&mut self, path: &str) -> Result<()> {
        self.stage_file_mut().rehydrate()?;

        if let Some(baseline_oid) = self.stage_file().stage().removals().get(path).cloned() {
            let blob = self.database().load_blob(&baseline_oid)?;
            self.workspace().write_file(path, blob.content())?;

            let stage = self.stage_file_mut().stage_mut();
            stage.unstage_removal(path);
            stage.stage_addition(path.to_string(), baseline_oid);
            return self.stage_file().write_updates();
        }

        let Some(content) = self.workspace().read_file(path)? else {
            return Ok(());
        };

        let blob = Blob::new(path.to_string(), content);
        let unmodified = self.stage_file().stage().baseline().get(path) == Some(blob.object_id());

        if unmodified {
            self.stage_file_mut().stage_mut().unstage_addition(path);
        } else {
            self.database().store(StoreKind::Staged, &blob)?;
            self.stage_file_mut()
                .stage_mut()
                .stage_addition(path.to_string(), blob.object_id().clone());
        }

        self.stage_file().write_updates()
    }
}
