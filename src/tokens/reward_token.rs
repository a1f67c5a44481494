//! Reward token minted by the farming engine
//!
//! The HVST token is the emission target of the farm. Minting is gated to a
//! single minter address; after deployment the admin hands that role to the
//! farm contract, which is then the only party able to mint.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::events::{Approval, Transfer};

/// HVST reward token (CEP-18)
#[odra::module]
pub struct RewardToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Token decimals
    decimals: Var<u8>,
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping: owner -> balance
    balances: Mapping<Address, U256>,
    /// Allowance mapping: (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
    /// The only address allowed to mint (the farm after deployment)
    minter: Var<Address>,
    /// Contract admin, may reassign the minter role
    admin: Var<Address>,
}

#[odra::module]
impl RewardToken {
    /// Initialize the reward token; the deployer starts as both admin and minter
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.name.set(String::from("Harvest Token"));
        self.symbol.set(String::from("HVST"));
        self.decimals.set(18);
        self.total_supply.set(U256::zero());
        self.minter.set(caller);
        self.admin.set(caller);
    }

    /// Get the token name
    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Get the token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    /// Get the token decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Get the total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }

    /// Get the balance of an address
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).unwrap_or_default()
    }

    /// Get the allowance for a spender
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    /// Transfer tokens to another address
    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);
        true
    }

    /// Approve a spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.approve_internal(caller, spender, amount);
        true
    }

    /// Transfer tokens from one address to another (requires approval)
    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);

        if current_allowance < amount {
            self.env().revert(TokenError::InsufficientAllowance);
        }

        self.approve_internal(from, caller, current_allowance - amount);
        self.transfer_internal(from, to, amount);
        true
    }

    /// Mint new tokens (minter only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.only_minter();

        let new_supply = self.total_supply() + amount;
        self.total_supply.set(new_supply);

        let new_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_balance);

        self.env().emit_event(Transfer {
            from: self.env().self_address(),
            to,
            value: amount,
        });
    }

    /// Get the current minter
    pub fn minter(&self) -> Address {
        self.minter.get_or_revert_with(TokenError::NotAuthorized)
    }

    /// Hand the minter role to another address (admin only).
    ///
    /// Called once after deployment to make the farm the sole minter.
    pub fn transfer_minter_role(&mut self, new_minter: Address) {
        self.only_admin();
        self.minter.set(new_minter);
    }

    /// Get the admin address
    pub fn admin(&self) -> Address {
        self.admin.get_or_revert_with(TokenError::NotAuthorized)
    }

    // Internal functions

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }

        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);

        self.env().emit_event(Transfer { from, to, value: amount });
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.env().emit_event(Approval {
            owner,
            spender,
            value: amount,
        });
    }

    fn only_minter(&self) {
        let caller = self.env().caller();
        let minter = self.minter.get_or_revert_with(TokenError::NotAuthorized);
        if caller != minter {
            self.env().revert(TokenError::NotAuthorized);
        }
    }

    fn only_admin(&self) {
        let caller = self.env().caller();
        let admin = self.admin.get_or_revert_with(TokenError::NotAuthorized);
        if caller != admin {
            self.env().revert(TokenError::NotAuthorized);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn test_init_defaults() {
        let env = odra_test::env();
        let token = RewardToken::deploy(&env, NoArgs);

        assert_eq!(token.name(), "Harvest Token");
        assert_eq!(token.symbol(), "HVST");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), U256::zero());
        assert_eq!(token.minter(), env.get_account(0));
    }

    #[test]
    fn test_mint_gated_to_minter() {
        let env = odra_test::env();
        let mut token = RewardToken::deploy(&env, NoArgs);
        let outsider = env.get_account(1);

        token.mint(outsider, U256::from(500));
        assert_eq!(token.balance_of(outsider), U256::from(500));

        env.set_caller(outsider);
        assert_eq!(
            token.try_mint(outsider, U256::from(500)).unwrap_err(),
            TokenError::NotAuthorized.into()
        );
    }

    #[test]
    fn test_minter_role_handover() {
        let env = odra_test::env();
        let mut token = RewardToken::deploy(&env, NoArgs);
        let farm = env.get_account(1);
        let user = env.get_account(2);

        token.transfer_minter_role(farm);
        assert_eq!(token.minter(), farm);

        env.set_caller(farm);
        token.mint(user, U256::from(42));
        assert_eq!(token.balance_of(user), U256::from(42));
        assert_eq!(token.total_supply(), U256::from(42));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let env = odra_test::env();
        let mut token = RewardToken::deploy(&env, NoArgs);
        let alice = env.get_account(1);
        let bob = env.get_account(2);

        token.mint(alice, U256::from(100));

        env.set_caller(alice);
        token.approve(bob, U256::from(60));

        env.set_caller(bob);
        token.transfer_from(alice, bob, U256::from(60));
        assert_eq!(token.balance_of(bob), U256::from(60));
        assert_eq!(token.allowance(alice, bob), U256::zero());

        assert_eq!(
            token.try_transfer_from(alice, bob, U256::from(1)).unwrap_err(),
            TokenError::InsufficientAllowance.into()
        );
    }
}
