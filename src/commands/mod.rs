//! User command implementations.
//!
//! Every command is an `impl Repository` block in its own file under
//! `porcelain`, taking the repository context explicitly and writing its
//! output through the context's writer.

pub mod porcelain;
