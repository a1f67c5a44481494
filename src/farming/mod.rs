//! Yield farming engine - weighted pools, HVST emission, single-stake receipt
//!
//! Stake assets earn newly minted HVST in proportion to pool weight and
//! elapsed time; pool 0 stakes HVST itself against the sHVST receipt.

pub mod farm;
pub mod errors;
pub mod events;


pub use farm::{Farm, PoolInfo, PoolKind, UserPosition, SINGLE_STAKE_POOL_ID, SINGLE_STAKE_WEIGHT};
pub use errors::FarmError;
pub use events::*;
