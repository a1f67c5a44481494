//! Open-mint CEP-18 token used as a staked asset
//!
//! Stands in for arbitrary LP tokens in tests and deploy scenarios. Anyone can
//! mint, mirroring the mock tokens the farm is exercised against.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::events::{Approval, Transfer};

/// Generic stake asset (CEP-18, open mint)
#[odra::module]
pub struct StakeToken {
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
}

#[odra::module]
impl StakeToken {
    /// Initialize the stake token with a name and symbol
    pub fn init(&mut self, name: String, symbol: String) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(18);
        self.total_supply.set(U256::zero());
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

    /// Mint tokens to an address (unrestricted, test asset)
    pub fn mint(&mut self, to: Address, amount: U256) {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::Deployer;

    fn setup() -> (odra::host::HostEnv, StakeTokenHostRef) {
        let env = odra_test::env();
        let token = StakeToken::deploy(
            &env,
            StakeTokenInitArgs {
                name: String::from("LP0"),
                symbol: String::from("LP0"),
            },
        );
        (env, token)
    }

    #[test]
    fn test_open_mint_and_transfer() {
        let (env, mut token) = setup();
        let alice = env.get_account(1);
        let bob = env.get_account(2);

        env.set_caller(alice);
        token.mint(alice, U256::from(2000));
        token.transfer(bob, U256::from(500));

        assert_eq!(token.balance_of(alice), U256::from(1500));
        assert_eq!(token.balance_of(bob), U256::from(500));
        assert_eq!(token.total_supply(), U256::from(2000));
    }

    #[test]
    fn test_transfer_exceeding_balance_rejected() {
        let (env, mut token) = setup();
        let alice = env.get_account(1);

        token.mint(alice, U256::from(10));
        env.set_caller(alice);
        assert_eq!(
            token.try_transfer(env.get_account(2), U256::from(11)).unwrap_err(),
            TokenError::InsufficientBalance.into()
        );
    }
}
