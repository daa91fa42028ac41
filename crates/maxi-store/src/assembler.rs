//! Settings assembly
//!
//! Builds a [`StoredSettings`] snapshot from the store:
//! 1. Resolve the external key of every batched [`StoreKey`]
//! 2. Read them through the [`BatchFetcher`]
//! 3. Coerce each raw string by the key's [`ValueKind`] and [`AbsencePolicy`]
//! 4. Read the decrypted seed separately, treating any failure as "no seed"
//!
//! A failed batched read aborts the assembly. A missing key never does.

use crate::client::ParameterStore;
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::fetch::{BatchFetcher, ParameterTable};
use crate::keys::{AbsencePolicy, StoreKey, ValueKind};
use crate::settings::StoredSettings;
use maxi_state::{PoolStateConverter, ProgramStateConverter, StateConverter};

/// Split a seed phrase into its words
///
/// Runs of commas and whitespace separate words; empty words are dropped.
/// An absent phrase yields no words.
#[must_use]
pub fn normalize_seed(raw: Option<&str>) -> Vec<String> {
    raw.map(|phrase| {
        phrase
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Combine a freshly read value with the snapshot's prior value
fn resolve<T>(key: StoreKey, fetched: Option<T>, prior: Option<T>) -> Option<T> {
    match key.absence_policy() {
        AbsencePolicy::Clear => fetched,
        AbsencePolicy::RetainPrior => fetched.or(prior),
    }
}

fn text(raw: Option<&str>) -> Option<String> {
    raw.map(str::to_string)
}

/// Parse a decimal value; empty strings count as absent
fn number(key: StoreKey, raw: Option<&str>) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring non-numeric value {:?} for {}", raw, key);
            None
        }
    }
}

/// Assembles settings snapshots from a parameter store
#[derive(Debug)]
pub struct SettingsAssembler<S> {
    store: S,
    config: SyncConfig,
}

impl<S: ParameterStore> SettingsAssembler<S> {
    /// Create assembler for a store and session configuration
    #[inline]
    #[must_use]
    pub fn new(store: S, config: SyncConfig) -> Self {
        Self { store, config }
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a complete snapshot starting from defaults
    ///
    /// # Errors
    /// - `SyncError::Fetch` if any batched read fails
    pub async fn assemble(&self) -> SyncResult<StoredSettings> {
        self.assemble_onto(StoredSettings::default()).await
    }

    /// Fetch a complete snapshot on top of `settings`
    ///
    /// Keys with [`AbsencePolicy::RetainPrior`] keep the value `settings`
    /// already holds when the store has none.
    ///
    /// # Errors
    /// - `SyncError::Fetch` if any batched read fails
    pub async fn assemble_onto(&self, mut settings: StoredSettings) -> SyncResult<StoredSettings> {
        tracing::info!(
            "Fetching settings (post-fix: {:?})",
            self.config.param_post_fix
        );

        let keys: Vec<(StoreKey, String)> = StoreKey::batched()
            .map(|key| (key, self.config.external_key(key)))
            .collect();
        let names: Vec<String> = keys.iter().map(|(_, name)| name.clone()).collect();

        let table = BatchFetcher::new(&self.store, self.config.batch_limit)
            .fetch_all(&names)
            .await?;

        for (key, name) in &keys {
            apply(&mut settings, *key, table.value(name));
        }

        settings.seed = self.fetch_seed().await;
        settings.param_post_fix.clone_from(&self.config.param_post_fix);

        tracing::info!(
            "Fetched {} of {} settings, seed words: {}",
            table.present_count(),
            table.len(),
            settings.seed.len()
        );
        Ok(settings)
    }

    /// Raw batched read of every setting, without coercion
    ///
    /// # Errors
    /// - `StoreError` from the first failing read
    pub async fn fetch_raw(&self) -> SyncResult<ParameterTable> {
        let names: Vec<String> = StoreKey::batched()
            .map(|key| self.config.external_key(key))
            .collect();
        Ok(BatchFetcher::new(&self.store, self.config.batch_limit)
            .fetch_all(&names)
            .await?)
    }

    async fn fetch_seed(&self) -> Vec<String> {
        match self
            .store
            .get_decrypted_parameter(&self.config.seed_key)
            .await
        {
            Ok(parameter) => {
                let words = normalize_seed(parameter.value.as_deref());
                if words.is_empty() {
                    tracing::warn!("Seed parameter {} is empty", self.config.seed_key);
                }
                words
            }
            Err(e) => {
                tracing::warn!("Seed parameter {} not available: {}", self.config.seed_key, e);
                Vec::new()
            }
        }
    }
}

/// Store one raw value into its snapshot field
fn apply(settings: &mut StoredSettings, key: StoreKey, raw: Option<&str>) {
    debug_assert_ne!(key.value_kind(), ValueKind::Secret);

    match key {
        StoreKey::TelegramNotificationChatId => {
            settings.chat_id = resolve(key, text(raw), settings.chat_id.take());
        }
        StoreKey::TelegramNotificationToken => {
            settings.token = resolve(key, text(raw), settings.token.take());
        }
        StoreKey::TelegramLogsChatId => {
            settings.log_chat_id = resolve(key, text(raw), settings.log_chat_id.take());
        }
        StoreKey::TelegramLogsToken => {
            settings.log_token = resolve(key, text(raw), settings.log_token.take());
        }
        StoreKey::DeFiAddress => {
            settings.address = resolve(key, text(raw), settings.address.take());
        }
        StoreKey::DeFiVault => {
            settings.vault = resolve(key, text(raw), settings.vault.take());
        }
        StoreKey::MinCollateralRatio => {
            if let Some(ratio) = resolve(
                key,
                number(key, raw),
                Some(settings.min_collateral_ratio),
            ) {
                settings.min_collateral_ratio = ratio;
            }
        }
        StoreKey::MaxCollateralRatio => {
            if let Some(ratio) = resolve(
                key,
                number(key, raw),
                Some(settings.max_collateral_ratio),
            ) {
                settings.max_collateral_ratio = ratio;
            }
        }
        StoreKey::LMToken => {
            settings.lm_token = resolve(key, text(raw), settings.lm_token.take());
        }
        StoreKey::ReinvestThreshold => {
            settings.reinvest_threshold =
                resolve(key, number(key, raw), settings.reinvest_threshold);
        }
        StoreKey::State => {
            settings.state_information = ProgramStateConverter::decode(raw);
        }
        StoreKey::PoolState => {
            settings.pool_information = PoolStateConverter::decode(raw);
        }
        StoreKey::MoveToTreshold => {
            settings.move_to_threshold = resolve(key, number(key, raw), settings.move_to_threshold);
        }
        StoreKey::MoveToAddress => {
            settings.move_to_address = resolve(key, text(raw), settings.move_to_address.take());
        }
        StoreKey::SwitchPoolInBlocks => {
            settings.switch_pool_in_blocks =
                resolve(key, number(key, raw), settings.switch_pool_in_blocks);
        }
        StoreKey::Failsafe => {
            settings.failsafe = resolve(key, number(key, raw), settings.failsafe);
        }
        StoreKey::DeFiWalletSeed => {}
    }
}
