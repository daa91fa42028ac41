//! Single-setting writes
//!
//! Each write targets exactly one key, always replaces the stored value, and
//! leaves any previously assembled snapshot untouched.

use crate::client::{ParameterStore, PutParameter};
use crate::error::{SyncError, SyncResult};
use crate::keys::{StoreKey, ValueKind};
use crate::settings::StoredSettings;
use maxi_state::{
    PoolStateConverter, PoolStateInformation, ProgramStateConverter, ProgramStateInformation,
    StateConverter,
};

/// Value accepted by [`SettingsWriter::write`]
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Plain string
    Text(String),
    /// Decimal number
    Number(f64),
    /// Program state
    ProgramState(ProgramStateInformation),
    /// Pool state
    PoolState(PoolStateInformation),
}

impl SettingValue {
    /// Kind of key this value belongs under
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::ProgramState(_) => ValueKind::ProgramState,
            Self::PoolState(_) => ValueKind::PoolState,
        }
    }

    /// String form written to the store
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::ProgramState(info) => ProgramStateConverter::encode(info),
            Self::PoolState(info) => PoolStateConverter::encode(info),
        }
    }
}

/// Writes single settings under a deployment's namespace
#[derive(Debug)]
pub struct SettingsWriter<S> {
    store: S,
    post_fix: String,
}

impl<S: ParameterStore> SettingsWriter<S> {
    /// Create writer for a namespace suffix
    #[inline]
    #[must_use]
    pub fn new(store: S, post_fix: impl Into<String>) -> Self {
        Self {
            store,
            post_fix: post_fix.into(),
        }
    }

    /// Create writer for the namespace a snapshot was read with
    #[inline]
    #[must_use]
    pub fn for_settings(store: S, settings: &StoredSettings) -> Self {
        Self::new(store, settings.param_post_fix.clone())
    }

    /// Namespace suffix applied to written keys
    #[inline]
    #[must_use]
    pub fn post_fix(&self) -> &str {
        &self.post_fix
    }

    /// Write one setting, replacing any stored value
    ///
    /// # Errors
    /// - `SyncError::ReadOnlyKey` for the seed key
    /// - `SyncError::ValueKindMismatch` if `value` does not fit the key
    /// - `SyncError::Write` if the store rejects the write
    pub async fn write(&self, key: StoreKey, value: &SettingValue) -> SyncResult<()> {
        let expected = key.value_kind();
        if expected == ValueKind::Secret {
            return Err(SyncError::ReadOnlyKey(key));
        }
        if value.kind() != expected {
            return Err(SyncError::ValueKindMismatch {
                key,
                expected,
                actual: value.kind(),
            });
        }

        let name = key.external_key(&self.post_fix);
        tracing::debug!("Writing {}", name);

        self.store
            .put_parameter(PutParameter::overwrite(name.clone(), value.encode()))
            .await
            .map_err(|e| {
                tracing::error!("Writing {} failed: {}", name, e);
                SyncError::write(name, e)
            })
    }

    /// Persist program state
    ///
    /// # Errors
    /// - `SyncError::Write` if the store rejects the write
    pub async fn write_program_state(
        &self,
        information: &ProgramStateInformation,
    ) -> SyncResult<()> {
        self.write(
            StoreKey::State,
            &SettingValue::ProgramState(information.clone()),
        )
        .await
    }

    /// Persist pool state
    ///
    /// # Errors
    /// - `SyncError::Write` if the store rejects the write
    pub async fn write_pool_state(&self, information: &PoolStateInformation) -> SyncResult<()> {
        self.write(StoreKey::PoolState, &SettingValue::PoolState(information.clone()))
            .await
    }

    /// Persist the liquidity mining token
    ///
    /// # Errors
    /// - `SyncError::Write` if the store rejects the write
    pub async fn write_lm_token(&self, token: &str) -> SyncResult<()> {
        self.write(StoreKey::LMToken, &SettingValue::Text(token.to_string()))
            .await
    }
}
