//! Pool targeting state

use crate::converter::JsonStateConverter;
use serde::{Deserialize, Serialize};

/// Pool state stored under the `poolstate` key
///
/// Records which pool the bot moved into and at which block height.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolStateInformation {
    /// Pool symbol, e.g. `DFI-DUSD`; `None` before the first switch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    /// Block height of the last switch
    pub block_height: u64,
}

impl PoolStateInformation {
    /// Create pool state for a switch at a block height
    #[inline]
    #[must_use]
    pub fn new(pool: impl Into<String>, block_height: u64) -> Self {
        Self {
            pool: Some(pool.into()),
            block_height,
        }
    }
}

/// Converter for [`PoolStateInformation`]
pub type PoolStateConverter = JsonStateConverter<PoolStateInformation>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateConverter;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            pool in proptest::option::of("[A-Z]{2,6}-[A-Z]{2,6}"),
            block_height in any::<u64>(),
        ) {
            let info = PoolStateInformation { pool, block_height };
            let raw = PoolStateConverter::encode(&info);
            prop_assert_eq!(PoolStateConverter::decode(Some(raw.as_str())), info);
        }
    }

    #[test]
    fn absent_decodes_to_no_pool() {
        let info = PoolStateConverter::decode(None);
        assert_eq!(info.pool, None);
        assert_eq!(info.block_height, 0);
    }

    #[test]
    fn new_records_pool_and_height() {
        let info = PoolStateInformation::new("DFI-DUSD", 1_000);
        assert_eq!(info.pool.as_deref(), Some("DFI-DUSD"));
        assert_eq!(info.block_height, 1_000);
    }
}
