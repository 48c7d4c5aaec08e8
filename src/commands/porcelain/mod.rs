//! Porcelain commands (the user-facing surface).
//!
//! - `init`: create an empty repository with a root commit
//! - `add` / `rm`: mutate the staging index
//! - `commit`: materialize the staged changes as a new commit
//! - `log` / `global-log` / `find`: inspect history
//! - `status`: derive the working-tree report
//! - `checkout`: restore a file or switch branches
//! - `branch` / `rm-branch`: manage branch pointers
//! - `reset`: move the current branch to an arbitrary commit
//! - `merge`: three-way merge of another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
