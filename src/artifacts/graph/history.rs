//! Lazy first-parent history walk, used by `log`.

use crate::areas::database::Database;
use crate::artifacts::errors::Result;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Iterator over the first-parent chain from a tip down to the root.
///
/// Merge commits contribute only their first parent to the walk; the
/// second-parent line is reachable through `ancestors` instead.
#[derive(new)]
pub struct History<'d> {
    database: &'d Database,
    next: Option<ObjectId>,
}

impl Iterator for History<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;

        match self.database.load_commit(&oid) {
            Ok(commit) => {
                self.next = commit.parent().cloned();
                Some(Ok(commit))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
