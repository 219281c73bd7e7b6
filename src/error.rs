//! Error types for the recency list
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::list::NodeRef;

// == List Error Enum ==
/// Errors reported by list operations.
///
/// Both kinds are recoverable: an empty list simply has nothing to evict,
/// and a stale handle means the caller's index is out of date.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The list holds no elements
    #[error("List is empty")]
    EmptyList,

    /// The handle belongs to another list or its element was already removed
    #[error("Node is not linked in this list: {0}")]
    StaleNode(NodeRef),
}

// == Result Type Alias ==
/// Convenience Result type for list operations.
pub type Result<T> = std::result::Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_message() {
        assert_eq!(ListError::EmptyList.to_string(), "List is empty");
    }
}
