pub mod commit_graph;
pub mod history;
