//! Typed error taxonomy for every fallible repository operation.
//!
//! Each variant carries the exact message printed to the user, so the
//! binary can report an error with a plain `{}` while library callers and
//! tests branch on the kind instead of string-matching output.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("A grit version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized grit directory.")]
    NotInitialized,

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("File does not exist in that commit.")]
    FileNotInCommit,

    #[error("No commit with that id exists.")]
    CommitNotFound,

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("No such branch exists.")]
    NoSuchBranch,

    #[error("A branch with that name does not exist.")]
    BranchNotFound,

    #[error("A branch with that name already exists.")]
    BranchExists,

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedConflict,

    /// Corrupted records, unreadable object files and other plumbing
    /// failures that have no scripted user-facing message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Internal(err.into())
    }
}
