//! Program state persisted between bot runs

use crate::converter::JsonStateConverter;
use serde::{Deserialize, Serialize};

/// Phase the bot was in when the state was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramState {
    /// Nothing pending
    #[default]
    Idle,
    /// A transaction was sent and has not been confirmed yet
    WaitingForTransaction,
    /// The last run stopped on an error
    Error,
}

/// Program state stored under the `state` key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgramStateInformation {
    /// Current phase
    pub state: ProgramState,
    /// Name of the pending operation (e.g. "reinvest")
    pub tx: String,
    /// Id of the pending transaction
    pub tx_id: String,
    /// Block height at which the state was written
    pub block_height: u64,
    /// Bot version that wrote the state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ProgramStateInformation {
    /// Create state for an operation at a block height
    #[inline]
    #[must_use]
    pub fn new(state: ProgramState, tx: impl Into<String>, block_height: u64) -> Self {
        Self {
            state,
            tx: tx.into(),
            tx_id: String::new(),
            block_height,
            version: None,
        }
    }

    /// With transaction id
    #[inline]
    #[must_use]
    pub fn with_tx_id(mut self, tx_id: impl Into<String>) -> Self {
        self.tx_id = tx_id.into();
        self
    }
}

/// Converter for [`ProgramStateInformation`]
pub type ProgramStateConverter = JsonStateConverter<ProgramStateInformation>;
