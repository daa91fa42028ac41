//! Vault-maxi structured state
//!
//! The parameter store only holds strings. Two settings are structured values
//! that travel through it as a single encoded string:
//!
//! - [`ProgramStateInformation`]: what the bot was doing when it last stopped
//! - [`PoolStateInformation`]: which liquidity pool the bot currently targets
//!
//! Both are converted through a [`StateConverter`]. Decoding never fails:
//! an absent, empty, or unreadable value yields the default state.
//!
//! # Example
//!
//! ```rust
//! use maxi_state::{ProgramState, ProgramStateConverter, ProgramStateInformation, StateConverter};
//!
//! let info =
//!     ProgramStateInformation::new(ProgramState::WaitingForTransaction, "reinvest", 2_100_000)
//!         .with_tx_id("ab12");
//! let raw = ProgramStateConverter::encode(&info);
//! assert_eq!(ProgramStateConverter::decode(Some(raw.as_str())), info);
//! assert_eq!(ProgramStateConverter::decode(None), ProgramStateInformation::default());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod converter;
mod pool;
mod program;

pub use converter::{JsonStateConverter, StateConverter};
pub use pool::{PoolStateConverter, PoolStateInformation};
pub use program::{ProgramState, ProgramStateConverter, ProgramStateInformation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
