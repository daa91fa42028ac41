//! Parameter store backed by a local JSON file
//!
//! The file holds one object mapping external keys to string values:
//!
//! ```json
//! { "/defichain-maxi/wallet/address": "df1q...", "/defichain-maxi/state": "{}" }
//! ```
//!
//! Useful for running a deployment against a checked-in settings file and for
//! dry runs. Enforces the same request limits as the remote store.

use crate::client::{Parameter, ParameterStore, PutParameter, STORE_BATCH_LIMIT};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// JSON-file parameter store
#[derive(Debug)]
pub struct LocalParameterStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl LocalParameterStore {
    /// Create store for a file; the file is created on first write
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, params: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(params)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ParameterStore for LocalParameterStore {
    async fn get_parameters(&self, names: &[String]) -> Result<Vec<Parameter>, StoreError> {
        if names.len() > STORE_BATCH_LIMIT {
            return Err(StoreError::TooManyNames {
                requested: names.len(),
                max: STORE_BATCH_LIMIT,
            });
        }

        let _guard = self.lock.lock().await;
        let params = self.load().await?;
        Ok(names
            .iter()
            .filter_map(|name| {
                params
                    .get(name)
                    .map(|value| Parameter::new(name.clone(), value.clone()))
            })
            .collect())
    }

    async fn get_decrypted_parameter(&self, name: &str) -> Result<Parameter, StoreError> {
        let _guard = self.lock.lock().await;
        let params = self.load().await?;
        params
            .get(name)
            .map(|value| Parameter::new(name, value.clone()))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn put_parameter(&self, request: PutParameter) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut params = self.load().await?;
        if !request.overwrite && params.contains_key(&request.name) {
            return Err(StoreError::AlreadyExists(request.name));
        }
        params.insert(request.name, request.value);
        self.save(&params).await
    }
}
