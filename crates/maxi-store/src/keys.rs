//! Logical settings keys and their external paths
//!
//! Every setting the bot knows about is a [`StoreKey`] variant. The variant
//! carries everything needed to move the value in and out of the store:
//! its path template, whether deployments namespace it, the kind of value
//! it holds, and what happens when the store has no value for it.
//!
//! Namespacing inserts a deployment suffix right after the [`NAMESPACE_MARKER`]
//! in the path, so `/defichain-maxi/state` becomes `/defichain-maxi-test/state`
//! for the suffix `-test`.

use std::fmt;

/// Literal segment the namespace suffix is appended to
pub const NAMESPACE_MARKER: &str = "-maxi";

/// Insert `suffix` immediately after the first [`NAMESPACE_MARKER`] in `template`
///
/// The rest of the path is kept byte for byte. An empty suffix, or a template
/// without the marker, yields the template unchanged.
#[must_use]
pub fn namespaced_key(template: &str, suffix: &str) -> String {
    match template.find(NAMESPACE_MARKER) {
        Some(idx) if !suffix.is_empty() => {
            let split = idx + NAMESPACE_MARKER.len();
            let mut key = String::with_capacity(template.len() + suffix.len());
            key.push_str(&template[..split]);
            key.push_str(suffix);
            key.push_str(&template[split..]);
            key
        }
        _ => template.to_string(),
    }
}

/// Kind of value stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Plain string
    Text,
    /// Decimal number
    Number,
    /// Encoded program state
    ProgramState,
    /// Encoded pool state
    PoolState,
    /// Encrypted secret, read with decryption
    Secret,
}

/// What a fetch does with a field the store has no value for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsencePolicy {
    /// Field becomes absent
    Clear,
    /// Field keeps the value the snapshot already had
    RetainPrior,
}

/// Logical settings key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// Notification channel chat id
    TelegramNotificationChatId,
    /// Notification bot token
    TelegramNotificationToken,
    /// Log channel chat id
    TelegramLogsChatId,
    /// Log bot token
    TelegramLogsToken,
    /// Wallet address
    DeFiAddress,
    /// Vault id
    DeFiVault,
    /// Encrypted mnemonic
    DeFiWalletSeed,
    /// Lower collateral ratio bound
    MinCollateralRatio,
    /// Upper collateral ratio bound
    MaxCollateralRatio,
    /// Liquidity mining token
    LMToken,
    /// Reinvest threshold
    ReinvestThreshold,
    /// Program state blob
    State,
    /// Pool state blob
    PoolState,
    /// Move-to threshold (the stored path keeps its historical spelling)
    MoveToTreshold,
    /// Move-to address
    MoveToAddress,
    /// Blocks between pool switches
    SwitchPoolInBlocks,
    /// Failsafe threshold
    Failsafe,
}

impl StoreKey {
    /// Every key, in declaration order
    pub const ALL: [StoreKey; 17] = [
        Self::TelegramNotificationChatId,
        Self::TelegramNotificationToken,
        Self::TelegramLogsChatId,
        Self::TelegramLogsToken,
        Self::DeFiAddress,
        Self::DeFiVault,
        Self::DeFiWalletSeed,
        Self::MinCollateralRatio,
        Self::MaxCollateralRatio,
        Self::LMToken,
        Self::ReinvestThreshold,
        Self::State,
        Self::PoolState,
        Self::MoveToTreshold,
        Self::MoveToAddress,
        Self::SwitchPoolInBlocks,
        Self::Failsafe,
    ];

    /// Path template, containing [`NAMESPACE_MARKER`]
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::TelegramNotificationChatId => "/defichain-maxi/telegram/notifications/chat-id",
            Self::TelegramNotificationToken => "/defichain-maxi/telegram/notifications/token",
            Self::TelegramLogsChatId => "/defichain-maxi/telegram/logs/chat-id",
            Self::TelegramLogsToken => "/defichain-maxi/telegram/logs/token",
            Self::DeFiAddress => "/defichain-maxi/wallet/address",
            Self::DeFiVault => "/defichain-maxi/wallet/vault",
            Self::DeFiWalletSeed => "/defichain-maxi/wallet/seed",
            Self::MinCollateralRatio => "/defichain-maxi/settings/min-collateral-ratio",
            Self::MaxCollateralRatio => "/defichain-maxi/settings/max-collateral-ratio",
            Self::LMToken => "/defichain-maxi/settings/lm-token",
            Self::ReinvestThreshold => "/defichain-maxi/settings/reinvest",
            Self::State => "/defichain-maxi/state",
            Self::PoolState => "/defichain-maxi/poolstate",
            Self::MoveToTreshold => "/defichain-maxi/settings/move-to-treshold",
            Self::MoveToAddress => "/defichain-maxi/settings/move-to-address",
            Self::SwitchPoolInBlocks => "/defichain-maxi/settings/switch-pool-in-blocks",
            Self::Failsafe => "/defichain-maxi/settings/failsafe",
        }
    }

    /// Whether the deployment suffix applies to this key
    ///
    /// Telegram channels are shared by all deployments. The seed key is fixed
    /// or overridden from the environment as a whole.
    #[must_use]
    pub const fn is_namespaced(self) -> bool {
        !matches!(
            self,
            Self::TelegramNotificationChatId
                | Self::TelegramNotificationToken
                | Self::TelegramLogsChatId
                | Self::TelegramLogsToken
                | Self::DeFiWalletSeed
        )
    }

    /// Kind of value stored under this key
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::MinCollateralRatio
            | Self::MaxCollateralRatio
            | Self::ReinvestThreshold
            | Self::MoveToTreshold
            | Self::SwitchPoolInBlocks
            | Self::Failsafe => ValueKind::Number,
            Self::State => ValueKind::ProgramState,
            Self::PoolState => ValueKind::PoolState,
            Self::DeFiWalletSeed => ValueKind::Secret,
            _ => ValueKind::Text,
        }
    }

    /// Behaviour when a fetch finds no value
    #[must_use]
    pub const fn absence_policy(self) -> AbsencePolicy {
        match self {
            Self::MinCollateralRatio | Self::MaxCollateralRatio => AbsencePolicy::RetainPrior,
            _ => AbsencePolicy::Clear,
        }
    }

    /// Whether the key is read through the batched fetch
    #[inline]
    #[must_use]
    pub const fn is_batched(self) -> bool {
        !matches!(self.value_kind(), ValueKind::Secret)
    }

    /// Concrete store path for a deployment suffix
    #[must_use]
    pub fn external_key(self, suffix: &str) -> String {
        if self.is_namespaced() {
            namespaced_key(self.template(), suffix)
        } else {
            self.template().to_string()
        }
    }

    /// Keys read through the batched fetch, in declaration order
    pub fn batched() -> impl Iterator<Item = StoreKey> {
        Self::ALL.into_iter().filter(|key| key.is_batched())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template())
    }
}
