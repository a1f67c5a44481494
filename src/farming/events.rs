//! Events for the farming engine

use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when stake enters a pool (pool 0 for enter_staking)
#[odra::event]
pub struct Deposit {
    pub user: Address,
    pub pool_id: u32,
    pub amount: U256,
    pub timestamp: u64,
}

/// Event emitted when stake leaves a pool (pool 0 for leave_staking)
#[odra::event]
pub struct Withdraw {
    pub user: Address,
    pub pool_id: u32,
    pub amount: U256,
    pub timestamp: u64,
}

/// Event emitted when a user pulls their stake without settling rewards
#[odra::event]
pub struct EmergencyWithdraw {
    pub user: Address,
    pub pool_id: u32,
    pub amount: U256,
    pub timestamp: u64,
}

/// Event emitted when a new pool is registered
#[odra::event]
pub struct PoolAdded {
    pub pool_id: u32,
    pub stake_token: Address,
    pub weight: U256,
    pub total_weight: U256,
}

/// Event emitted when a pool's emission weight changes
#[odra::event]
pub struct PoolWeightUpdated {
    pub pool_id: u32,
    pub old_weight: U256,
    pub new_weight: U256,
    pub total_weight: U256,
}

/// Event emitted when the global emission multiplier changes
#[odra::event]
pub struct MultiplierUpdated {
    pub old_multiplier: U256,
    pub new_multiplier: U256,
}

/// Event emitted when the dev role moves to a new address
#[odra::event]
pub struct DevRoleTransferred {
    pub previous_dev: Address,
    pub new_dev: Address,
}

/// Event emitted when the owner capability moves to a new address
#[odra::event]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}
