//! Error types for settings synchronization
//!
//! Three layers:
//! - [`StoreError`]: a single parameter-store call failed
//! - [`ConfigError`]: a session was configured with impossible values
//! - [`SyncError`]: a fetch or write operation failed as a whole

use crate::keys::{StoreKey, ValueKind};

/// Errors reported by a parameter-store transport
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested parameter does not exist
    #[error("parameter not found: {0}")]
    NotFound(String),

    /// More names than the store accepts in one read
    #[error("too many names in one request: {requested} (max: {max})")]
    TooManyNames { requested: usize, max: usize },

    /// Write without overwrite hit an existing parameter
    #[error("parameter already exists: {0}")]
    AlreadyExists(String),

    /// Network, authentication, or service failure
    #[error("transport error: {0}")]
    Transport(String),

    /// IO error on a local store file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Local store file is not a valid parameter document
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create transport error
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Check if the error only means the parameter is missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Invalid session configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Batch limit of zero
    #[error("batch limit must be positive")]
    ZeroBatchLimit,

    /// Batch limit above what the store accepts
    #[error("batch limit {requested} exceeds store maximum {max}")]
    BatchLimitExceeded { requested: usize, max: usize },
}

/// Settings synchronization errors
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A batched settings read failed; no snapshot was produced
    #[error("settings fetch failed: {0}")]
    Fetch(#[from] StoreError),

    /// Writing a single setting failed
    #[error("writing {key} failed: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Key cannot be written through the settings writer
    #[error("{0:?} is read-only")]
    ReadOnlyKey(StoreKey),

    /// Value does not match the kind stored under the key
    #[error("{key:?} holds {expected:?} values, got {actual:?}")]
    ValueKindMismatch {
        key: StoreKey,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Create write error for an external key
    #[inline]
    pub fn write(key: impl Into<String>, source: StoreError) -> Self {
        Self::Write {
            key: key.into(),
            source,
        }
    }

    /// Check if retrying the whole operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Fetch(StoreError::Transport(_))
                | Self::Write {
                    source: StoreError::Transport(_),
                    ..
                }
        )
    }
}

/// Result type alias for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::TooManyNames {
            requested: 11,
            max: 10,
        };
        assert_eq!(err.to_string(), "too many names in one request: 11 (max: 10)");
    }

    #[test]
    fn write_error_display() {
        let err = SyncError::write("/defichain-maxi/state", StoreError::transport("timeout"));
        assert_eq!(
            err.to_string(),
            "writing /defichain-maxi/state failed: transport error: timeout"
        );
    }

    #[test]
    fn error_conversions() {
        let err: SyncError = StoreError::NotFound("x".to_string()).into();
        assert!(matches!(err, SyncError::Fetch(StoreError::NotFound(_))));

        let err: SyncError = ConfigError::ZeroBatchLimit.into();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn retryable_errors() {
        assert!(SyncError::Fetch(StoreError::transport("reset")).is_retryable());
        assert!(!SyncError::ReadOnlyKey(StoreKey::DeFiWalletSeed).is_retryable());
        assert!(!SyncError::write("k", StoreError::AlreadyExists("k".into())).is_retryable());
    }
}
