//! Token collaborators for the farming engine
//!
//! The engine only ever talks to staked assets through the [`Cep18Token`]
//! external interface; the concrete modules here are the reward and receipt
//! tokens it controls, plus an open-mint stake token used by tests and the
//! deploy CLI in place of real LP tokens.

pub mod receipt_token;
pub mod reward_token;
pub mod stake_token;

pub use receipt_token::ReceiptToken;
pub use reward_token::RewardToken;
pub use stake_token::StakeToken;

use odra::prelude::*;
use odra::casper_types::U256;

/// External interface for any CEP-18 compatible token accepted as a staked asset
#[odra::external_contract]
pub trait Cep18Token {
    /// Get the balance of an address
    fn balance_of(&self, owner: Address) -> U256;

    /// Transfer tokens from the caller
    fn transfer(&mut self, to: Address, amount: U256) -> bool;

    /// Transfer tokens on behalf of another address (requires approval)
    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool;

    /// Approve a spender
    fn approve(&mut self, spender: Address, amount: U256) -> bool;

    /// Get the allowance granted to a spender
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Get the total supply
    fn total_supply(&self) -> U256;
}
