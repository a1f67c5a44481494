//! Farm - weighted multi-pool staking with HVST emission
//!
//! Each pool holds one staked asset and accrues newly minted HVST in
//! proportion to its weight and the elapsed block time. Settlement is O(1)
//! per user through the accumulated-reward-per-share fixed point: a position
//! only stores its stake and the accumulator value already credited to it
//! (the reward debt), and pending reward is the difference.
//!
//! Pool 0 is reserved at construction for the single-stake pool, where HVST
//! itself is staked against a 1:1 sHVST receipt.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::FarmError;
use super::events::*;
use crate::math::FarmMath;
use crate::tokens::reward_token::RewardTokenContractRef;
use crate::tokens::receipt_token::ReceiptTokenContractRef;
use crate::tokens::Cep18TokenContractRef;

/// Index of the reserved single-stake pool
pub const SINGLE_STAKE_POOL_ID: u32 = 0;

/// Emission weight the single-stake pool is created with
pub const SINGLE_STAKE_WEIGHT: u128 = 1000;

/// Distinguishes the reserved reward-token pool from ordinary stake pools
#[odra::odra_type]
pub enum PoolKind {
    /// Pool 0: HVST staked against the sHVST receipt
    SingleStake,
    /// Any pool registered through `add_pool`
    General,
}

/// Per-pool bookkeeping
#[odra::odra_type]
pub struct PoolInfo {
    /// Token accepted by this pool
    pub stake_token: Address,
    /// Whether this is the reserved single-stake pool
    pub kind: PoolKind,
    /// Share of global emission this pool receives
    pub weight: U256,
    /// Block time at which accrual was last settled
    pub last_accrual_time: u64,
    /// Reward earned per staked unit since pool creation, scaled by ACC_SCALE.
    /// Monotonically non-decreasing.
    pub acc_reward_per_share: U256,
    /// Total amount currently staked in the pool
    pub total_staked: U256,
}

/// Per (pool, user) ledger record
#[odra::odra_type]
pub struct UserPosition {
    /// Staked amount
    pub amount: U256,
    /// Accumulator value already settled: amount * acc_reward_per_share / ACC_SCALE
    pub reward_debt: U256,
}

/// Farm contract
#[odra::module]
pub struct Farm {
    /// HVST token address (farm must hold the minter role)
    reward_token: Var<Address>,
    /// sHVST token address (farm must hold the mint/burn role)
    receipt_token: Var<Address>,
    /// Owner capability: pool registry and multiplier changes
    owner: Var<Address>,
    /// Dev capability: receives the fee cut, may hand itself over
    dev: Var<Address>,
    /// Base emission per block-time unit
    reward_per_unit: Var<U256>,
    /// Step-function multiplier applied to the base emission
    bonus_multiplier: Var<U256>,
    /// Accrual begins at this block time
    start_time: Var<u64>,
    /// Sum of all pool weights
    total_weight: Var<U256>,
    /// Pool registry, append-only, indices stable
    pools: Mapping<u32, PoolInfo>,
    /// Number of registered pools
    pool_count: Var<u32>,
    /// User ledger: (pool_id, user) -> position
    positions: Mapping<(u32, Address), UserPosition>,
}

#[odra::module]
impl Farm {
    /// Initialize the farm and register the single-stake pool as pool 0.
    ///
    /// The caller becomes the owner. The farm expects to be handed the
    /// reward token's minter role and the receipt token's farm role before
    /// the first settlement.
    pub fn init(
        &mut self,
        reward_token: Address,
        receipt_token: Address,
        dev: Address,
        reward_per_unit: U256,
        start_time: u64,
    ) {
        let caller = self.env().caller();
        self.reward_token.set(reward_token);
        self.receipt_token.set(receipt_token);
        self.owner.set(caller);
        self.dev.set(dev);
        self.reward_per_unit.set(reward_per_unit);
        self.bonus_multiplier.set(U256::one());
        self.start_time.set(start_time);

        let now = self.env().get_block_time();
        let single_stake = PoolInfo {
            stake_token: reward_token,
            kind: PoolKind::SingleStake,
            weight: U256::from(SINGLE_STAKE_WEIGHT),
            last_accrual_time: core::cmp::max(now, start_time),
            acc_reward_per_share: U256::zero(),
            total_staked: U256::zero(),
        };
        self.pools.set(&SINGLE_STAKE_POOL_ID, single_stake);
        self.pool_count.set(1);
        self.total_weight.set(U256::from(SINGLE_STAKE_WEIGHT));
    }

    // ========================================
    // Pool Registry (owner)
    // ========================================

    /// Register a new pool for a staked asset (owner only).
    ///
    /// When `with_update` is false, pools settled after this call see their
    /// unsettled backlog diluted by the new weight; callers that care must
    /// request the mass settlement.
    pub fn add_pool(&mut self, weight: U256, stake_token: Address, with_update: bool) -> u32 {
        self.only_owner();

        if with_update {
            self.mass_settle();
        }

        let pool_id = self.pool_count.get_or_default();
        let start_time = self.start_time.get_or_default();
        let now = self.env().get_block_time();

        let new_total = FarmMath::add(self.total_weight.get_or_default(), weight)
            .unwrap_or_revert(&self.env());
        self.total_weight.set(new_total);

        let pool = PoolInfo {
            stake_token,
            kind: PoolKind::General,
            weight,
            last_accrual_time: core::cmp::max(now, start_time),
            acc_reward_per_share: U256::zero(),
            total_staked: U256::zero(),
        };
        self.pools.set(&pool_id, pool);
        self.pool_count.set(pool_id + 1);

        self.rebalance_single_stake_weight();

        self.env().emit_event(PoolAdded {
            pool_id,
            stake_token,
            weight,
            total_weight: self.total_weight.get_or_default(),
        });

        pool_id
    }

    /// Change a pool's emission weight (owner only).
    ///
    /// The target pool is settled first so the new weight never reprices its
    /// unsettled span; `with_update` widens that settlement to every pool.
    pub fn set_pool_weight(&mut self, pool_id: u32, new_weight: U256, with_update: bool) {
        self.only_owner();

        if self.pools.get(&pool_id).is_none() {
            self.env().revert(FarmError::InvalidPool);
        }

        if with_update {
            self.mass_settle();
        } else {
            self.settle_pool(pool_id);
        }

        let mut pool = self.pools.get(&pool_id).unwrap();
        let old_weight = pool.weight;
        if old_weight != new_weight {
            let total = self.total_weight.get_or_default();
            let total = FarmMath::sub(total, old_weight).unwrap_or_revert(&self.env());
            let total = FarmMath::add(total, new_weight).unwrap_or_revert(&self.env());
            self.total_weight.set(total);

            pool.weight = new_weight;
            self.pools.set(&pool_id, pool);

            self.rebalance_single_stake_weight();
        }

        self.env().emit_event(PoolWeightUpdated {
            pool_id,
            old_weight,
            new_weight,
            total_weight: self.total_weight.get_or_default(),
        });
    }

    // ========================================
    // Reward Accrual Engine
    // ========================================

    /// Settle one pool's accrual up to the current block time.
    ///
    /// Idempotent within a time unit. An empty pool only fast-forwards its
    /// clock: emission for a span nobody staked through is forfeited, not
    /// banked. Accumulator and clock are committed before the mint calls.
    pub fn settle_pool(&mut self, pool_id: u32) {
        let mut pool = self
            .pools
            .get(&pool_id)
            .unwrap_or_revert_with(&self.env(), FarmError::InvalidPool);

        let now = self.env().get_block_time();
        if now <= pool.last_accrual_time {
            return;
        }

        if pool.total_staked.is_zero() {
            pool.last_accrual_time = now;
            self.pools.set(&pool_id, pool);
            return;
        }

        let elapsed = now - pool.last_accrual_time;
        let span = FarmMath::multiplier_span(elapsed, self.bonus_multiplier.get_or_default())
            .unwrap_or_revert(&self.env());
        let pool_reward = FarmMath::pool_reward(
            self.reward_per_unit.get_or_default(),
            span,
            pool.weight,
            self.total_weight.get_or_default(),
        )
        .unwrap_or_revert(&self.env());
        let dev_fee = FarmMath::dev_fee(pool_reward).unwrap_or_revert(&self.env());

        let delta = FarmMath::per_share_delta(pool_reward, pool.total_staked)
            .unwrap_or_revert(&self.env());
        pool.acc_reward_per_share = FarmMath::add(pool.acc_reward_per_share, delta)
            .unwrap_or_revert(&self.env());
        pool.last_accrual_time = now;
        self.pools.set(&pool_id, pool);

        // Unconditional mints, zero amounts included
        let dev = self.dev.get_or_revert_with(FarmError::Unauthorized);
        let mut reward_token = self.reward_token_ref();
        reward_token.mint(dev, dev_fee);
        reward_token.mint(self.env().self_address(), pool_reward);
    }

    /// Settle every registered pool
    pub fn mass_settle(&mut self) {
        let count = self.pool_count.get_or_default();
        for pool_id in 0..count {
            self.settle_pool(pool_id);
        }
    }

    // ========================================
    // Staking Gateway
    // ========================================

    /// Stake into a general pool. `amount == 0` is a claim-only call.
    pub fn deposit(&mut self, pool_id: u32, amount: U256) {
        let caller = self.env().caller();
        self.ensure_general_pool(pool_id);

        self.settle_pool(pool_id);
        let pool = self.pools.get(&pool_id).unwrap();

        let position = self.position_of(pool_id, caller);
        let pending = self.settled_pending(&position, &pool);

        let new_amount = FarmMath::add(position.amount, amount).unwrap_or_revert(&self.env());
        self.commit_position(pool_id, caller, new_amount, &pool);

        let mut pool = self.pools.get(&pool_id).unwrap();
        pool.total_staked = FarmMath::add(pool.total_staked, amount).unwrap_or_revert(&self.env());
        let stake_token = pool.stake_token;
        self.pools.set(&pool_id, pool);

        if !pending.is_zero() {
            self.pay_reward(caller, pending);
        }
        if !amount.is_zero() {
            let ok = Cep18TokenContractRef::new(self.env(), stake_token).transfer_from(
                caller,
                self.env().self_address(),
                amount,
            );
            if !ok {
                self.env().revert(FarmError::CollaboratorFailure);
            }
        }

        self.env().emit_event(Deposit {
            user: caller,
            pool_id,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Unstake from a general pool, settling pending reward first
    pub fn withdraw(&mut self, pool_id: u32, amount: U256) {
        let caller = self.env().caller();
        self.ensure_general_pool(pool_id);

        self.settle_pool(pool_id);
        let pool = self.pools.get(&pool_id).unwrap();

        let position = self.position_of(pool_id, caller);
        if amount > position.amount {
            self.env().revert(FarmError::InsufficientStake);
        }
        let pending = self.settled_pending(&position, &pool);

        let new_amount = FarmMath::sub(position.amount, amount).unwrap_or_revert(&self.env());
        self.commit_position(pool_id, caller, new_amount, &pool);

        let mut pool = self.pools.get(&pool_id).unwrap();
        pool.total_staked = FarmMath::sub(pool.total_staked, amount).unwrap_or_revert(&self.env());
        let stake_token = pool.stake_token;
        self.pools.set(&pool_id, pool);

        if !pending.is_zero() {
            self.pay_reward(caller, pending);
        }
        if !amount.is_zero() {
            let ok = Cep18TokenContractRef::new(self.env(), stake_token).transfer(caller, amount);
            if !ok {
                self.env().revert(FarmError::CollaboratorFailure);
            }
        }

        self.env().emit_event(Withdraw {
            user: caller,
            pool_id,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Stake HVST into the single-stake pool and receive sHVST 1:1
    pub fn enter_staking(&mut self, amount: U256) {
        let caller = self.env().caller();

        self.settle_pool(SINGLE_STAKE_POOL_ID);
        let pool = self.pools.get(&SINGLE_STAKE_POOL_ID).unwrap();

        let position = self.position_of(SINGLE_STAKE_POOL_ID, caller);
        let pending = self.settled_pending(&position, &pool);

        let new_amount = FarmMath::add(position.amount, amount).unwrap_or_revert(&self.env());
        self.commit_position(SINGLE_STAKE_POOL_ID, caller, new_amount, &pool);

        let mut pool = self.pools.get(&SINGLE_STAKE_POOL_ID).unwrap();
        pool.total_staked = FarmMath::add(pool.total_staked, amount).unwrap_or_revert(&self.env());
        self.pools.set(&SINGLE_STAKE_POOL_ID, pool);

        if !pending.is_zero() {
            self.pay_reward(caller, pending);
        }
        if !amount.is_zero() {
            let ok = self.reward_token_ref().transfer_from(
                caller,
                self.env().self_address(),
                amount,
            );
            if !ok {
                self.env().revert(FarmError::CollaboratorFailure);
            }
        }
        self.receipt_token_ref().mint(caller, amount);

        self.env().emit_event(Deposit {
            user: caller,
            pool_id: SINGLE_STAKE_POOL_ID,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Unstake HVST from the single-stake pool, burning sHVST 1:1
    pub fn leave_staking(&mut self, amount: U256) {
        let caller = self.env().caller();

        self.settle_pool(SINGLE_STAKE_POOL_ID);
        let pool = self.pools.get(&SINGLE_STAKE_POOL_ID).unwrap();

        let position = self.position_of(SINGLE_STAKE_POOL_ID, caller);
        if amount > position.amount {
            self.env().revert(FarmError::InsufficientStake);
        }
        let pending = self.settled_pending(&position, &pool);

        let new_amount = FarmMath::sub(position.amount, amount).unwrap_or_revert(&self.env());
        self.commit_position(SINGLE_STAKE_POOL_ID, caller, new_amount, &pool);

        let mut pool = self.pools.get(&SINGLE_STAKE_POOL_ID).unwrap();
        pool.total_staked = FarmMath::sub(pool.total_staked, amount).unwrap_or_revert(&self.env());
        self.pools.set(&SINGLE_STAKE_POOL_ID, pool);

        if !pending.is_zero() {
            self.pay_reward(caller, pending);
        }
        if !amount.is_zero() {
            let ok = self.reward_token_ref().transfer(caller, amount);
            if !ok {
                self.env().revert(FarmError::CollaboratorFailure);
            }
        }
        self.receipt_token_ref().burn(caller, amount);

        self.env().emit_event(Withdraw {
            user: caller,
            pool_id: SINGLE_STAKE_POOL_ID,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Return the caller's full stake, forfeiting all pending reward.
    ///
    /// Never touches the accrual engine or the mint path; this is the escape
    /// hatch for when reward settlement itself cannot complete. Receipt
    /// tokens from the single-stake pool are deliberately not burned here:
    /// the exit must not depend on the caller still holding them.
    pub fn emergency_withdraw(&mut self, pool_id: u32) {
        let caller = self.env().caller();
        let mut pool = self
            .pools
            .get(&pool_id)
            .unwrap_or_revert_with(&self.env(), FarmError::InvalidPool);

        let position = self.position_of(pool_id, caller);
        let amount = position.amount;

        self.positions.set(
            &(pool_id, caller),
            UserPosition {
                amount: U256::zero(),
                reward_debt: U256::zero(),
            },
        );
        pool.total_staked = FarmMath::sub(pool.total_staked, amount).unwrap_or_revert(&self.env());
        let stake_token = pool.stake_token;
        self.pools.set(&pool_id, pool);

        if !amount.is_zero() {
            let ok = Cep18TokenContractRef::new(self.env(), stake_token).transfer(caller, amount);
            if !ok {
                self.env().revert(FarmError::CollaboratorFailure);
            }
        }

        self.env().emit_event(EmergencyWithdraw {
            user: caller,
            pool_id,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    // ========================================
    // Admin Control
    // ========================================

    /// Change the global emission multiplier (owner only).
    ///
    /// Every pool is settled first, so the old value prices all reward up to
    /// this point and the new value applies strictly afterward.
    pub fn set_multiplier(&mut self, new_multiplier: U256) {
        self.only_owner();
        self.mass_settle();

        let old_multiplier = self.bonus_multiplier.get_or_default();
        self.bonus_multiplier.set(new_multiplier);

        self.env().emit_event(MultiplierUpdated {
            old_multiplier,
            new_multiplier,
        });
    }

    /// Hand the owner capability to another address (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.only_owner();
        let previous_owner = self.owner.get_or_revert_with(FarmError::Unauthorized);
        self.owner.set(new_owner);

        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
    }

    /// Hand the dev role to another address (current dev only)
    pub fn transfer_dev_role(&mut self, new_dev: Address) {
        let caller = self.env().caller();
        let previous_dev = self.dev.get_or_revert_with(FarmError::Unauthorized);
        if caller != previous_dev {
            self.env().revert(FarmError::Unauthorized);
        }
        self.dev.set(new_dev);

        self.env().emit_event(DevRoleTransferred {
            previous_dev,
            new_dev,
        });
    }

    // ========================================
    // View Functions
    // ========================================

    /// Number of registered pools
    pub fn pool_length(&self) -> u32 {
        self.pool_count.get_or_default()
    }

    /// Pool bookkeeping, if the index exists
    pub fn pool_info(&self, pool_id: u32) -> Option<PoolInfo> {
        self.pools.get(&pool_id)
    }

    /// A user's ledger record, if one was ever created
    pub fn user_info(&self, pool_id: u32, user: Address) -> Option<UserPosition> {
        self.positions.get(&(pool_id, user))
    }

    /// Reward claimable right now, simulating a settlement without mutating
    pub fn pending_reward(&self, pool_id: u32, user: Address) -> U256 {
        let pool = match self.pools.get(&pool_id) {
            Some(pool) => pool,
            None => return U256::zero(),
        };
        let position = self.position_of(pool_id, user);
        if position.amount.is_zero() {
            return U256::zero();
        }

        let mut acc = pool.acc_reward_per_share;
        let now = self.env().get_block_time();
        if now > pool.last_accrual_time && !pool.total_staked.is_zero() {
            let elapsed = now - pool.last_accrual_time;
            let span =
                FarmMath::multiplier_span(elapsed, self.bonus_multiplier.get_or_default())
                    .unwrap_or_revert(&self.env());
            let pool_reward = FarmMath::pool_reward(
                self.reward_per_unit.get_or_default(),
                span,
                pool.weight,
                self.total_weight.get_or_default(),
            )
            .unwrap_or_revert(&self.env());
            let delta = FarmMath::per_share_delta(pool_reward, pool.total_staked)
                .unwrap_or_revert(&self.env());
            acc = FarmMath::add(acc, delta).unwrap_or_revert(&self.env());
        }

        FarmMath::pending(position.amount, acc, position.reward_debt)
            .unwrap_or_revert(&self.env())
    }

    /// Sum of all pool weights
    pub fn total_weight(&self) -> U256 {
        self.total_weight.get_or_default()
    }

    /// Base emission per block-time unit
    pub fn reward_per_unit(&self) -> U256 {
        self.reward_per_unit.get_or_default()
    }

    /// Current emission multiplier
    pub fn bonus_multiplier(&self) -> U256 {
        self.bonus_multiplier.get_or_default()
    }

    /// Block time at which accrual begins
    pub fn start_time(&self) -> u64 {
        self.start_time.get_or_default()
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner.get_or_revert_with(FarmError::Unauthorized)
    }

    /// Current dev role holder
    pub fn dev(&self) -> Address {
        self.dev.get_or_revert_with(FarmError::Unauthorized)
    }

    // ========================================
    // Internal Functions
    // ========================================

    /// Keep the single-stake pool at a third of the combined general weight.
    ///
    /// Runs after every registry change so pool 0 stays competitive as farms
    /// are added, without the owner micromanaging it.
    fn rebalance_single_stake_weight(&mut self) {
        let count = self.pool_count.get_or_default();
        let mut points = U256::zero();
        for pool_id in 1..count {
            let pool = self.pools.get(&pool_id).unwrap();
            points = FarmMath::add(points, pool.weight).unwrap_or_revert(&self.env());
        }
        if points.is_zero() {
            return;
        }

        let points = points / U256::from(3);
        let mut single_stake = self.pools.get(&SINGLE_STAKE_POOL_ID).unwrap();
        let old_weight = single_stake.weight;
        if points == old_weight {
            return;
        }

        let total = self.total_weight.get_or_default();
        let total = FarmMath::sub(total, old_weight).unwrap_or_revert(&self.env());
        let total = FarmMath::add(total, points).unwrap_or_revert(&self.env());
        self.total_weight.set(total);
        single_stake.weight = points;
        self.pools.set(&SINGLE_STAKE_POOL_ID, single_stake);

        self.env().emit_event(PoolWeightUpdated {
            pool_id: SINGLE_STAKE_POOL_ID,
            old_weight,
            new_weight: points,
            total_weight: total,
        });
    }

    /// Pending reward for a position against a freshly settled pool
    fn settled_pending(&self, position: &UserPosition, pool: &PoolInfo) -> U256 {
        if position.amount.is_zero() {
            return U256::zero();
        }
        FarmMath::pending(position.amount, pool.acc_reward_per_share, position.reward_debt)
            .unwrap_or_revert(&self.env())
    }

    /// Write back a position with its debt recomputed from the new amount
    fn commit_position(&mut self, pool_id: u32, user: Address, amount: U256, pool: &PoolInfo) {
        let reward_debt = FarmMath::accrued(amount, pool.acc_reward_per_share)
            .unwrap_or_revert(&self.env());
        self.positions.set(&(pool_id, user), UserPosition { amount, reward_debt });
    }

    /// Transfer reward from the farm's custody, capped at its balance so a
    /// truncation shortfall can never block a withdrawal
    fn pay_reward(&mut self, to: Address, amount: U256) {
        let mut reward_token = self.reward_token_ref();
        let custody = reward_token.balance_of(self.env().self_address());
        let payout = if amount > custody { custody } else { amount };
        if payout.is_zero() {
            return;
        }
        let ok = reward_token.transfer(to, payout);
        if !ok {
            self.env().revert(FarmError::CollaboratorFailure);
        }
    }

    /// Deposit/withdraw only operate on general pools; the single-stake pool
    /// is reached through enter_staking/leave_staking
    fn ensure_general_pool(&self, pool_id: u32) {
        if pool_id == SINGLE_STAKE_POOL_ID || self.pools.get(&pool_id).is_none() {
            self.env().revert(FarmError::InvalidPool);
        }
    }

    fn position_of(&self, pool_id: u32, user: Address) -> UserPosition {
        self.positions.get(&(pool_id, user)).unwrap_or(UserPosition {
            amount: U256::zero(),
            reward_debt: U256::zero(),
        })
    }

    fn reward_token_ref(&self) -> RewardTokenContractRef {
        let address = self.reward_token.get_or_revert_with(FarmError::CollaboratorFailure);
        RewardTokenContractRef::new(self.env(), address)
    }

    fn receipt_token_ref(&self) -> ReceiptTokenContractRef {
        let address = self.receipt_token.get_or_revert_with(FarmError::CollaboratorFailure);
        ReceiptTokenContractRef::new(self.env(), address)
    }

    fn only_owner(&self) {
        let caller = self.env().caller();
        let owner = self.owner.get_or_revert_with(FarmError::Unauthorized);
        if caller != owner {
            self.env().revert(FarmError::Unauthorized);
        }
    }
}
