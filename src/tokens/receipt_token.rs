//! Receipt token for the single-stake pool
//!
//! Minted 1:1 when reward tokens enter the single-stake pool and burned 1:1
//! when they leave, so its circulating supply mirrors the pool's staked total.
//! Only the farm contract may mint or burn.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::TokenError;
use crate::events::{Approval, Transfer};

/// sHVST receipt token (CEP-18)
#[odra::module]
pub struct ReceiptToken {
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
    /// Farm contract address, the only party allowed to mint and burn
    farm: Var<Address>,
    /// Contract admin, may reassign the farm role
    admin: Var<Address>,
}

#[odra::module]
impl ReceiptToken {
    /// Initialize the receipt token; the deployer starts as admin and farm
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.name.set(String::from("Staked Harvest"));
        self.symbol.set(String::from("sHVST"));
        self.decimals.set(18);
        self.total_supply.set(U256::zero());
        self.farm.set(caller);
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

    /// Mint receipt tokens (farm only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.only_farm();

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

    /// Burn receipt tokens (farm only)
    pub fn burn(&mut self, from: Address, amount: U256) {
        self.only_farm();

        let current_balance = self.balance_of(from);
        if current_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }

        self.balances.set(&from, current_balance - amount);
        let new_supply = self.total_supply() - amount;
        self.total_supply.set(new_supply);

        self.env().emit_event(Transfer {
            from,
            to: self.env().self_address(),
            value: amount,
        });
    }

    /// Get the farm address
    pub fn farm(&self) -> Address {
        self.farm.get_or_revert_with(TokenError::NotAuthorized)
    }

    /// Hand the mint/burn capability to the farm contract (admin only)
    pub fn transfer_farm_role(&mut self, new_farm: Address) {
        self.only_admin();
        self.farm.set(new_farm);
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

    fn only_farm(&self) {
        let caller = self.env().caller();
        let farm = self.farm.get_or_revert_with(TokenError::NotAuthorized);
        if caller != farm {
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
    fn test_mint_and_burn_gated_to_farm() {
        let env = odra_test::env();
        let mut token = ReceiptToken::deploy(&env, NoArgs);
        let farm = env.get_account(1);
        let user = env.get_account(2);

        token.transfer_farm_role(farm);

        env.set_caller(farm);
        token.mint(user, U256::from(250));
        assert_eq!(token.balance_of(user), U256::from(250));
        assert_eq!(token.total_supply(), U256::from(250));

        token.burn(user, U256::from(250));
        assert_eq!(token.balance_of(user), U256::zero());
        assert_eq!(token.total_supply(), U256::zero());

        env.set_caller(user);
        assert_eq!(
            token.try_mint(user, U256::from(1)).unwrap_err(),
            TokenError::NotAuthorized.into()
        );
    }

    #[test]
    fn test_burn_exceeding_balance_rejected() {
        let env = odra_test::env();
        let mut token = ReceiptToken::deploy(&env, NoArgs);
        let user = env.get_account(1);

        token.mint(user, U256::from(10));
        assert_eq!(
            token.try_burn(user, U256::from(11)).unwrap_err(),
            TokenError::InsufficientBalance.into()
        );
    }
}
