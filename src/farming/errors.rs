//! Error types for the farming engine

use odra::prelude::*;

#[odra::odra_error]
pub enum FarmError {
    /// Caller lacks the owner or dev capability
    Unauthorized = 1,
    /// Pool index does not exist, or is the reserved single-stake pool
    InvalidPool = 2,
    /// Withdrawal amount exceeds the caller's recorded stake
    InsufficientStake = 3,
    /// External token collaborator reported failure
    CollaboratorFailure = 4,
    /// Arithmetic overflow
    Overflow = 5,
    /// Arithmetic underflow
    Underflow = 6,
    /// Division by zero
    DivisionByZero = 7,
}
