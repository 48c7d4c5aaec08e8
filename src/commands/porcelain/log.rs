use crate::areas::database::StoreKind;
use crate::areas::repository::Repository;
use crate::artifacts::errors::{Error, Result};
use std::io::Write;

impl Repository {
    /// Print the first-parent history of the current branch, newest first.
    pub fn log(&mut self) -> Result<()> {
        let head = self.head_oid()?;

        for commit in self.graph().history(head) {
            writeln!(self.writer(), "{}", commit?.log_entry())?;
        }

        Ok(())
    }

    /// Print every commit in the store, in no meaningful order.
    pub fn global_log(&mut self) -> Result<()> {
        for oid in self.database().list(StoreKind::Commits)? {
            let commit = self.database().load_commit(&oid)?;
            writeln!(self.writer(), "{}", commit.log_entry())?;
        }

        Ok(())
    }

    /// Print the ids of all commits whose message matches exactly, one per
    /// line.
    pub fn find(&mut self, message: &str) -> Result<()> {
        let matches = self.graph().find_by_message(message)?;
        if matches.is_empty() {
            return Err(Error::NoCommitWithMessage);
        }

        for oid in matches {
            writeln!(self.writer(), "{}", oid)?;
        }

        Ok(())
    }
}
