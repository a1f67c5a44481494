//! Error definitions for the token contracts
use odra::prelude::*;

/// Custom errors for the CEP-18 token contracts
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer_from
    InsufficientAllowance = 100,

    /// Insufficient balance for transfer or burn
    InsufficientBalance = 101,

    /// Caller lacks the minter or admin capability
    NotAuthorized = 102,
}
