//! Assembled settings snapshot

use maxi_state::{PoolStateInformation, ProgramStateInformation};
use serde::Serialize;
use std::fmt;

/// Collateral ratio floor used until the store provides one
pub const DEFAULT_MIN_COLLATERAL_RATIO: f64 = 200.0;

/// Collateral ratio ceiling used until the store provides one
pub const DEFAULT_MAX_COLLATERAL_RATIO: f64 = 250.0;

/// Settings snapshot for one synchronization session
///
/// Produced by [`SettingsAssembler`](crate::SettingsAssembler). Writes through
/// [`SettingsWriter`](crate::SettingsWriter) do not update an existing
/// snapshot; fetch again to observe them.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    /// Notification channel chat id
    pub chat_id: Option<String>,
    /// Notification bot token
    #[serde(skip)]
    pub token: Option<String>,
    /// Log channel chat id
    pub log_chat_id: Option<String>,
    /// Log bot token
    #[serde(skip)]
    pub log_token: Option<String>,
    /// Wallet address
    pub address: Option<String>,
    /// Vault id
    pub vault: Option<String>,
    /// Lower collateral ratio bound
    pub min_collateral_ratio: f64,
    /// Upper collateral ratio bound
    pub max_collateral_ratio: f64,
    /// Liquidity mining token symbol
    #[serde(rename = "LMToken")]
    pub lm_token: Option<String>,
    /// Minimum amount worth reinvesting
    pub reinvest_threshold: Option<f64>,
    /// Amount above which funds move to `move_to_address`
    pub move_to_threshold: Option<f64>,
    /// Blocks to wait between pool switches
    pub switch_pool_in_blocks: Option<f64>,
    /// Failsafe threshold
    pub failsafe: Option<f64>,
    /// Program state from the last run
    pub state_information: ProgramStateInformation,
    /// Current pool state
    pub pool_information: PoolStateInformation,
    /// Destination for surplus funds
    pub move_to_address: Option<String>,
    /// Mnemonic words, empty if the seed could not be read
    #[serde(skip)]
    pub seed: Vec<String>,
    /// Namespace suffix this snapshot was read with
    pub param_post_fix: String,
}

impl StoredSettings {
    /// Create snapshot with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With collateral ratio bounds
    #[inline]
    #[must_use]
    pub fn with_collateral_ratios(mut self, min: f64, max: f64) -> Self {
        self.min_collateral_ratio = min;
        self.max_collateral_ratio = max;
        self
    }

    /// Whether a seed was available
    #[inline]
    #[must_use]
    pub fn has_seed(&self) -> bool {
        !self.seed.is_empty()
    }
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            chat_id: None,
            token: None,
            log_chat_id: None,
            log_token: None,
            address: None,
            vault: None,
            min_collateral_ratio: DEFAULT_MIN_COLLATERAL_RATIO,
            max_collateral_ratio: DEFAULT_MAX_COLLATERAL_RATIO,
            lm_token: None,
            reinvest_threshold: None,
            move_to_threshold: None,
            switch_pool_in_blocks: None,
            failsafe: None,
            state_information: ProgramStateInformation::default(),
            pool_information: PoolStateInformation::default(),
            move_to_address: None,
            seed: Vec::new(),
            param_post_fix: String::new(),
        }
    }
}

fn redacted(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

impl fmt::Debug for StoredSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSettings")
            .field("chat_id", &self.chat_id)
            .field("token", &redacted(self.token.as_ref()))
            .field("log_chat_id", &self.log_chat_id)
            .field("log_token", &redacted(self.log_token.as_ref()))
            .field("address", &self.address)
            .field("vault", &self.vault)
            .field("min_collateral_ratio", &self.min_collateral_ratio)
            .field("max_collateral_ratio", &self.max_collateral_ratio)
            .field("lm_token", &self.lm_token)
            .field("reinvest_threshold", &self.reinvest_threshold)
            .field("move_to_threshold", &self.move_to_threshold)
            .field("switch_pool_in_blocks", &self.switch_pool_in_blocks)
            .field("failsafe", &self.failsafe)
            .field("state_information", &self.state_information)
            .field("pool_information", &self.pool_information)
            .field("move_to_address", &self.move_to_address)
            .field("seed_words", &self.seed.len())
            .field("param_post_fix", &self.param_post_fix)
            .finish()
    }
}
