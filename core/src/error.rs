use thiserror::Error;

use crate::DocId;

/// Errors returned by index, query and collaborator operations.
///
/// Every failure is local to the call that produced it; the index is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("document {0} not found")]
    DocumentNotFound(DocId),

    #[error("ordinal {ordinal} out of range for {count} documents")]
    OrdinalOutOfRange { ordinal: usize, count: usize },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

impl SearchError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidArgument(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for SearchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SearchError::WorkerPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
