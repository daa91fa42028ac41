//! Testing utilities for the vault-maxi settings workspace
//!
//! In-memory parameter store that records every call and can be told to fail.

#![allow(missing_docs)]

use async_trait::async_trait;
use maxi_state::{PoolStateInformation, ProgramState, ProgramStateInformation};
use maxi_store::{Parameter, ParameterStore, PutParameter, StoreError, StoreKey, STORE_BATCH_LIMIT};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Call observed by [`InMemoryParameterStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetParameters(Vec<String>),
    GetDecrypted(String),
    Put(PutParameter),
}

#[derive(Debug, Default)]
struct Inner {
    params: HashMap<String, String>,
    calls: Vec<StoreCall>,
    fail_reads_containing: Option<String>,
    fail_secrets_with: Option<String>,
    fail_writes_with: Option<String>,
}

/// Recording in-memory parameter store
///
/// Enforces [`STORE_BATCH_LIMIT`] like the remote store does.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    inner: Mutex<Inner>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `(external key, value)` pairs
    pub fn with_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (name, value) in params {
            store.set(name, value);
        }
        store
    }

    pub fn set(&self, name: &str, value: &str) {
        self.inner
            .lock()
            .params
            .insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.lock().params.get(name).cloned()
    }

    /// Fail batched reads whose names include `name`
    pub fn fail_reads_containing(&self, name: &str) {
        self.inner.lock().fail_reads_containing = Some(name.to_string());
    }

    /// Fail decrypted reads with a transport error
    pub fn fail_secrets(&self, message: &str) {
        self.inner.lock().fail_secrets_with = Some(message.to_string());
    }

    /// Fail writes with a transport error
    pub fn fail_writes(&self, message: &str) {
        self.inner.lock().fail_writes_with = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    /// Name lists of every batched read, in call order
    pub fn read_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::GetParameters(names) => Some(names),
                _ => None,
            })
            .collect()
    }

    pub fn puts(&self) -> Vec<PutParameter> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Put(put) => Some(put),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn get_parameters(&self, names: &[String]) -> Result<Vec<Parameter>, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::GetParameters(names.to_vec()));

        if names.len() > STORE_BATCH_LIMIT {
            return Err(StoreError::TooManyNames {
                requested: names.len(),
                max: STORE_BATCH_LIMIT,
            });
        }
        if let Some(name) = &inner.fail_reads_containing {
            if names.contains(name) {
                return Err(StoreError::transport(format!("read failed for {name}")));
            }
        }

        Ok(names
            .iter()
            .filter_map(|name| {
                inner
                    .params
                    .get(name)
                    .map(|value| Parameter::new(name.clone(), value.clone()))
            })
            .collect())
    }

    async fn get_decrypted_parameter(&self, name: &str) -> Result<Parameter, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::GetDecrypted(name.to_string()));

        if let Some(message) = &inner.fail_secrets_with {
            return Err(StoreError::transport(message.clone()));
        }
        inner
            .params
            .get(name)
            .map(|value| Parameter::new(name, value.clone()))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn put_parameter(&self, request: PutParameter) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Put(request.clone()));

        if let Some(message) = &inner.fail_writes_with {
            return Err(StoreError::transport(message.clone()));
        }
        if !request.overwrite && inner.params.contains_key(&request.name) {
            return Err(StoreError::AlreadyExists(request.name));
        }
        inner.params.insert(request.name, request.value);
        Ok(())
    }
}

/// Store holding a value for every setting of a deployment
pub fn populated_store(post_fix: &str) -> InMemoryParameterStore {
    let store = InMemoryParameterStore::new();
    for key in StoreKey::ALL {
        let name = key.external_key(post_fix);
        let value = match key {
            StoreKey::TelegramNotificationChatId | StoreKey::TelegramLogsChatId => "12345",
            StoreKey::TelegramNotificationToken | StoreKey::TelegramLogsToken => "123:bot-token",
            StoreKey::DeFiAddress => "df1qexampleaddress",
            StoreKey::DeFiVault => "vault-0001",
            StoreKey::DeFiWalletSeed => "abandon, ability  able about",
            StoreKey::MinCollateralRatio => "180",
            StoreKey::MaxCollateralRatio => "220",
            StoreKey::LMToken => "BTC",
            StoreKey::ReinvestThreshold => "0.5",
            StoreKey::State => concat!(
                r#"{"state":"waiting-for-transaction","tx":"reinvest","#,
                r#""txId":"ab12","blockHeight":100}"#
            ),
            StoreKey::PoolState => r#"{"pool":"BTC-DFI","blockHeight":90}"#,
            StoreKey::MoveToTreshold => "1000",
            StoreKey::MoveToAddress => "df1qcoldstorage",
            StoreKey::SwitchPoolInBlocks => "2880",
            StoreKey::Failsafe => "150",
        };
        store.set(&name, value);
    }
    store
}

/// Program state matching [`populated_store`]
pub fn sample_program_state() -> ProgramStateInformation {
    ProgramStateInformation::new(ProgramState::WaitingForTransaction, "reinvest", 100)
        .with_tx_id("ab12")
}

/// Pool state matching [`populated_store`]
pub fn sample_pool_state() -> PoolStateInformation {
    PoolStateInformation::new("BTC-DFI", 90)
}
