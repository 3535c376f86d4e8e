use thiserror::Error;

/// Contract violations in a tree handed to the layout engine.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    #[error("node `{node}` lists unknown child `{child}`")]
    UnknownChild { node: String, child: String },
    #[error("node `{node}` references unknown parent `{parent}`")]
    UnknownParent { node: String, parent: String },
    #[error("node `{node}` and parent `{parent}` disagree about their link")]
    ParentMismatch { node: String, parent: String },
    #[error("parent/child cycle through node `{0}`")]
    Cycle(String),
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
}
