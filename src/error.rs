//! Error types for ttlstore.
//!
//! Absence is not an error: a missing or expired key is reported as `None`.
//! The variants here cover the two conditions a caller can actually recover
//! from: asking for a value as the wrong kind, and building a store without
//! a Tokio runtime to host its sweeper.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors returned by [`TtlStore`](crate::TtlStore) operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A typed accessor found a value of a different kind under the key
    #[error("type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The store was constructed outside of a Tokio runtime
    #[error("no Tokio runtime available to run the expiry sweeper")]
    NoRuntime,
}

impl StoreError {
    /// Returns true if this is a [`StoreError::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, StoreError::TypeMismatch { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
