//! Vault-maxi settings store
//!
//! Synchronizes the bot's settings with a remote hierarchical parameter store
//! that only holds strings, caps reads at ten names per request, and is shared
//! by several deployments told apart by a namespace suffix.
//!
//! # Core Operations
//!
//! - **Key derivation**: [`StoreKey::external_key`] places the deployment
//!   suffix after the `-maxi` marker of each path
//! - **Fetch**: [`SettingsAssembler`] reads every setting through the
//!   [`BatchFetcher`] and coerces it into a typed [`StoredSettings`]
//! - **Write**: [`SettingsWriter`] replaces one setting at a time
//!
//! # Architecture
//!
//! ```text
//! SyncConfig ─→ SettingsAssembler ─→ BatchFetcher ─→ ParameterStore
//!                      │                                 ↑
//!                      └─→ StoredSettings ─→ SettingsWriter
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use maxi_store::{LocalParameterStore, SettingsAssembler, SettingsWriter, SyncConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = std::sync::Arc::new(LocalParameterStore::new("params.json"));
//! let assembler = SettingsAssembler::new(store.clone(), SyncConfig::from_env());
//! let settings = assembler.assemble().await?;
//!
//! let writer = SettingsWriter::for_settings(store, &settings);
//! writer.write_lm_token("BTC").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod assembler;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod keys;
pub mod local;
pub mod settings;
pub mod writer;

// Re-exports for convenience
pub use assembler::{normalize_seed, SettingsAssembler};
pub use client::{Parameter, ParameterStore, ParameterType, PutParameter, STORE_BATCH_LIMIT};
pub use config::{SyncConfig, POST_FIX_ENV, SEED_KEY_ENV};
pub use error::{ConfigError, StoreError, SyncError, SyncResult};
pub use fetch::{BatchFetcher, ParameterTable};
pub use keys::{namespaced_key, AbsencePolicy, StoreKey, ValueKind, NAMESPACE_MARKER};
pub use local::LocalParameterStore;
pub use settings::{StoredSettings, DEFAULT_MAX_COLLATERAL_RATIO, DEFAULT_MIN_COLLATERAL_RATIO};
pub use writer::{SettingValue, SettingsWriter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
