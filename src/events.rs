//! Shared CEP-18 event definitions used by every token module in the crate
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when tokens move between accounts (mint and burn use the
/// token contract's own address as the counterparty)
#[odra::event]
pub struct Transfer {
    /// Sender address
    pub from: Address,
    /// Recipient address
    pub to: Address,
    /// Amount transferred
    pub value: U256,
}

/// Event emitted when an allowance is set
#[odra::event]
pub struct Approval {
    /// Token owner
    pub owner: Address,
    /// Approved spender
    pub spender: Address,
    /// Approved amount
    pub value: U256,
}
