//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::record::RecordId;

/// Domain errors represent malformed record structures.
/// These are independent of input format and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// `index` is the position in the input sequence for flat inputs. For
    /// nested trees it is the node's pre-order position, which equals its
    /// position in the flattened output.
    #[error("invalid record at position {index}: field '{field}' {reason}")]
    InvalidRecord {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("cycle detected in hierarchy at id {id}")]
    CycleDetected { id: RecordId },

    #[error("record {id} references unknown parent {parent}")]
    DanglingParent { id: RecordId, parent: RecordId },

    #[error("record {id} is nested deeper than the limit of {limit} levels")]
    DepthExceeded { id: RecordId, limit: usize },
}

impl DomainError {
    pub(crate) fn invalid(index: usize, field: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidRecord {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
