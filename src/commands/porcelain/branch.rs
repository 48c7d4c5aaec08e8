use crate::areas::repository::Repository;
use crate::artifacts::errors::Result;

impl Repository {
    /// Create a branch pointing at the current tip. `HEAD` does not move.
    pub fn branch(&mut self, name: &str) -> Result<()> {
        let head = self.head_oid()?;
        self.refs().create_branch(name, &head)
    }

    /// Delete a branch pointer; the commits it reached stay in the store.
    pub fn rm_branch(&mut self, name: &str) -> Result<()> {
        self.refs().delete_branch(name)
    }
}
