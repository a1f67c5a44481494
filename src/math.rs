//! Fixed-point reward arithmetic for the farming engine
//!
//! The accumulator tracks reward-per-staked-unit scaled by `ACC_SCALE` so that
//! fractional per-share values stay exact in integer math. All intermediates
//! are `U256`, which leaves ample headroom for `amount * acc_reward_per_share`
//! style products.
use odra::casper_types::U256;
use crate::farming::errors::FarmError;

/// Scaling factor for the accumulated-reward-per-share fixed point (1e12)
pub const ACC_SCALE: u128 = 1_000_000_000_000;

/// Dev fee numerator (10% of every pool accrual is minted extra to the dev role)
pub const DEV_FEE_NUMERATOR: u128 = 1;

/// Dev fee denominator
pub const DEV_FEE_DENOMINATOR: u128 = 10;

/// Checked arithmetic and reward formulas shared by the farming engine
pub struct FarmMath;

impl FarmMath {
    /// Addition with overflow check
    pub fn add(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_add(b).ok_or(FarmError::Overflow)
    }

    /// Subtraction with underflow check
    pub fn sub(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_sub(b).ok_or(FarmError::Underflow)
    }

    /// Multiplication with overflow check
    pub fn mul(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_mul(b).ok_or(FarmError::Overflow)
    }

    /// Truncating division with zero check
    pub fn div(a: U256, b: U256) -> Result<U256, FarmError> {
        if b.is_zero() {
            return Err(FarmError::DivisionByZero);
        }
        Ok(a / b)
    }

    /// Elapsed time scaled by the global emission multiplier.
    ///
    /// The multiplier is a step function: the value in effect at settlement
    /// time applies to the whole unsettled span.
    pub fn multiplier_span(elapsed: u64, bonus_multiplier: U256) -> Result<U256, FarmError> {
        Self::mul(U256::from(elapsed), bonus_multiplier)
    }

    /// Reward accrued by one pool over a multiplier-scaled span:
    /// `reward_per_unit * span * weight / total_weight`, truncating.
    pub fn pool_reward(
        reward_per_unit: U256,
        span: U256,
        weight: U256,
        total_weight: U256,
    ) -> Result<U256, FarmError> {
        let scaled = Self::mul(Self::mul(reward_per_unit, span)?, weight)?;
        Self::div(scaled, total_weight)
    }

    /// Extra amount minted to the dev role for a given pool accrual
    pub fn dev_fee(pool_reward: U256) -> Result<U256, FarmError> {
        Self::div(
            Self::mul(pool_reward, U256::from(DEV_FEE_NUMERATOR))?,
            U256::from(DEV_FEE_DENOMINATOR),
        )
    }

    /// Accumulator increase for a pool accrual: `pool_reward * ACC_SCALE / total_staked`
    pub fn per_share_delta(pool_reward: U256, total_staked: U256) -> Result<U256, FarmError> {
        Self::div(Self::mul(pool_reward, U256::from(ACC_SCALE))?, total_staked)
    }

    /// Reward settled for a position at a given accumulator value:
    /// `amount * acc_reward_per_share / ACC_SCALE`
    pub fn accrued(amount: U256, acc_reward_per_share: U256) -> Result<U256, FarmError> {
        Self::div(
            Self::mul(amount, acc_reward_per_share)?,
            U256::from(ACC_SCALE),
        )
    }

    /// Newly pending reward: `accrued - reward_debt`.
    ///
    /// Underflow-checked; after every settlement the debt never exceeds the
    /// accrued value, so an `Underflow` here indicates corrupted state.
    pub fn pending(
        amount: U256,
        acc_reward_per_share: U256,
        reward_debt: U256,
    ) -> Result<U256, FarmError> {
        Self::sub(Self::accrued(amount, acc_reward_per_share)?, reward_debt)
    }
}
