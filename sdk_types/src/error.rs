//! SDK error types

use thiserror::Error;

/// Errors returned by SDK operations
///
/// This is a closed, flat taxonomy shared by the registry, the event
/// pump, and every host-boundary call. Success is `Ok(())`; there is no
/// success variant and no error payload beyond the category itself,
/// matching the host ABI's integer return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SdkError {
    /// Bad argument: out-of-range id, pin, or port, or an empty topic
    #[error("invalid argument")]
    Invalid,

    /// Operation timed out (reserved by the ABI, unused by the dispatch core)
    #[error("operation timed out")]
    Timeout,

    /// No live entry matches the unregister or lookup target
    #[error("not found")]
    NotFound,

    /// Resource is busy (reserved by the ABI)
    #[error("resource busy")]
    Busy,

    /// A fixed-capacity table is exhausted
    #[error("no memory")]
    NoMemory,
}

/// Result alias used across the SDK
pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SdkError::Invalid.to_string(), "invalid argument");
        assert_eq!(SdkError::NoMemory.to_string(), "no memory");
        assert_eq!(SdkError::NotFound.to_string(), "not found");
    }

    #[test]
    fn test_errors_are_comparable() {
        let result: SdkResult<()> = Err(SdkError::NotFound);
        assert_eq!(result, Err(SdkError::NotFound));
        assert_ne!(result, Err(SdkError::Invalid));
    }
}
