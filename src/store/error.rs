use super::models::TodoId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error("unknown filter '{0}' (expected all, finished or unfinished)")]
    InvalidFilter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(StoreError::NotFound(TodoId(7)).to_string(), "todo 7 not found");
        assert_eq!(
            StoreError::InvalidFilter("done".to_string()).to_string(),
            "unknown filter 'done' (expected all, finished or unfinished)"
        );
    }
}
