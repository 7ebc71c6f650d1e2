use crate::types::TodoId;
use thiserror::Error;

/// Failures reported by a [`crate::store::TodoStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("todo not found: {0}")]
    NotFound(TodoId),
}

#[derive(Debug, Error)]
pub enum GitodoError {
    #[error("not initialized: run 'gitodo init'")]
    NotInitialized,

    #[error("failed to read todo store: {0}")]
    StoreRead(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("index {index} out of range for list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("repository not found: {0}")]
    RepoNotFound(u64),

    #[error("repository already tracked: {0}")]
    RepoExists(u64),

    #[error("invalid repository name '{0}': expected owner/name")]
    InvalidRepoName(String),

    #[error("invalid color '{0}': expected #RRGGBB or a palette name")]
    InvalidColor(String),

    #[error("todo not found: {0}")]
    TodoNotFound(String),

    #[error("todo id prefix '{0}' matches more than one item")]
    AmbiguousTodoId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GitodoError>;
