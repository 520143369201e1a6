use crate::index::DocId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Failures surfaced by the engine. Every variant is raised before any
/// index structure is touched, so a failed call leaves the engine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid document id {0}")]
    InvalidId(DocId),

    #[error("document id {0} is already indexed")]
    DuplicateId(DocId),

    #[error("word {0:?} contains control characters")]
    InvalidWord(String),

    #[error("query word {0:?} is invalid")]
    InvalidQueryWord(String),

    #[error("stop word {0:?} is invalid")]
    InvalidStopWord(String),

    #[error("document {0} not found")]
    DocumentNotFound(DocId),
}
