//! Session configuration
//!
//! Everything the synchronization reads from the process environment is
//! captured here once, so the assembler and writer never look it up ambiently.

use crate::client::STORE_BATCH_LIMIT;
use crate::error::ConfigError;
use crate::keys::StoreKey;
use std::num::NonZeroUsize;

/// Environment variable holding the deployment namespace suffix
pub const POST_FIX_ENV: &str = "VAULTMAXI_STORE_POSTIX";

/// Environment variable overriding the seed parameter key
pub const SEED_KEY_ENV: &str = "DEFICHAIN_SEED_KEY";

/// Configuration for one synchronization session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Namespace suffix applied to every namespaced key
    pub param_post_fix: String,
    /// Key of the encrypted seed parameter
    pub seed_key: String,
    /// Names per batched read
    pub batch_limit: NonZeroUsize,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup
    ///
    /// Unset variables fall back to the defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(post_fix) = lookup(POST_FIX_ENV) {
            config.param_post_fix = post_fix;
        }
        if let Some(seed_key) = lookup(SEED_KEY_ENV) {
            config.seed_key = seed_key;
        }
        config
    }

    /// With namespace suffix
    #[inline]
    #[must_use]
    pub fn with_post_fix(mut self, post_fix: impl Into<String>) -> Self {
        self.param_post_fix = post_fix.into();
        self
    }

    /// With seed parameter key
    #[inline]
    #[must_use]
    pub fn with_seed_key(mut self, seed_key: impl Into<String>) -> Self {
        self.seed_key = seed_key.into();
        self
    }

    /// With batch limit
    ///
    /// # Errors
    /// - `ConfigError::ZeroBatchLimit` for zero
    /// - `ConfigError::BatchLimitExceeded` above [`STORE_BATCH_LIMIT`]
    pub fn with_batch_limit(mut self, limit: usize) -> Result<Self, ConfigError> {
        let limit = NonZeroUsize::new(limit).ok_or(ConfigError::ZeroBatchLimit)?;
        if limit.get() > STORE_BATCH_LIMIT {
            return Err(ConfigError::BatchLimitExceeded {
                requested: limit.get(),
                max: STORE_BATCH_LIMIT,
            });
        }
        self.batch_limit = limit;
        Ok(self)
    }

    /// External key for a logical key in this session
    #[inline]
    #[must_use]
    pub fn external_key(&self, key: StoreKey) -> String {
        match key {
            StoreKey::DeFiWalletSeed => self.seed_key.clone(),
            _ => key.external_key(&self.param_post_fix),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            param_post_fix: String::new(),
            seed_key: StoreKey::DeFiWalletSeed.template().to_string(),
            batch_limit: NonZeroUsize::new(STORE_BATCH_LIMIT).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = SyncConfig::new();
        assert_eq!(config.param_post_fix, "");
        assert_eq!(config.seed_key, "/defichain-maxi/wallet/seed");
        assert_eq!(config.batch_limit.get(), STORE_BATCH_LIMIT);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            (POST_FIX_ENV, "-test"),
            (SEED_KEY_ENV, "/custom/seed"),
        ]
        .into_iter()
        .collect();

        let config = SyncConfig::from_lookup(|name| env.get(name).map(ToString::to_string));
        assert_eq!(config.param_post_fix, "-test");
        assert_eq!(config.seed_key, "/custom/seed");
    }

    #[test]
    fn empty_lookup_keeps_defaults() {
        assert_eq!(SyncConfig::from_lookup(|_| None), SyncConfig::default());
    }

    #[test]
    fn batch_limit_bounds() {
        assert_eq!(
            SyncConfig::new().with_batch_limit(0),
            Err(ConfigError::ZeroBatchLimit)
        );
        assert_eq!(
            SyncConfig::new().with_batch_limit(11),
            Err(ConfigError::BatchLimitExceeded {
                requested: 11,
                max: STORE_BATCH_LIMIT
            })
        );
        assert_eq!(
            SyncConfig::new().with_batch_limit(4).unwrap().batch_limit.get(),
            4
        );
    }

    #[test]
    fn seed_key_uses_override() {
        let config = SyncConfig::new().with_post_fix("-a").with_seed_key("/other/seed");
        assert_eq!(config.external_key(StoreKey::DeFiWalletSeed), "/other/seed");
        assert_eq!(config.external_key(StoreKey::State), "/defichain-maxi-a/state");
    }
}
