//! Parameter-store transport seam
//!
//! The synchronization logic talks to the remote store only through
//! [`ParameterStore`]. Implementations handle auth, retries, and timeouts;
//! anything they cannot recover from surfaces as a [`StoreError`].

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum number of names the store accepts in one `get_parameters` call
pub const STORE_BATCH_LIMIT: usize = 10;

/// Parameter returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// External key
    pub name: String,
    /// Stored value, if the store returned one
    pub value: Option<String>,
}

impl Parameter {
    /// Create parameter with a value
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Storage type of a written parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterType {
    /// Plain string
    #[default]
    String,
}

/// Single-parameter write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutParameter {
    /// External key
    pub name: String,
    /// Value to store
    pub value: String,
    /// Replace an existing value
    pub overwrite: bool,
    /// Storage type
    pub kind: ParameterType,
}

impl PutParameter {
    /// Plain string write that replaces any existing value
    #[inline]
    #[must_use]
    pub fn overwrite(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            overwrite: true,
            kind: ParameterType::String,
        }
    }
}

/// Remote hierarchical key-value parameter store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Read up to [`STORE_BATCH_LIMIT`] parameters
    ///
    /// Names the store does not know are left out of the result.
    async fn get_parameters(&self, names: &[String]) -> Result<Vec<Parameter>, StoreError>;

    /// Read one parameter with decryption
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the parameter does not exist
    async fn get_decrypted_parameter(&self, name: &str) -> Result<Parameter, StoreError>;

    /// Write one parameter
    ///
    /// # Errors
    /// - `StoreError::AlreadyExists` if the parameter exists and `overwrite` is false
    async fn put_parameter(&self, request: PutParameter) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: ParameterStore + ?Sized> ParameterStore for Arc<S> {
    async fn get_parameters(&self, names: &[String]) -> Result<Vec<Parameter>, StoreError> {
        (**self).get_parameters(names).await
    }

    async fn get_decrypted_parameter(&self, name: &str) -> Result<Parameter, StoreError> {
        (**self).get_decrypted_parameter(name).await
    }

    async fn put_parameter(&self, request: PutParameter) -> Result<(), StoreError> {
        (**self).put_parameter(request).await
    }
}
