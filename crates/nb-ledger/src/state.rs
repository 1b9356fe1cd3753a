//! The account-based ledger state.
//!
//! Two stores live side by side: the bank (native coins, keyed by account and
//! denomination, with a per-denom supply counter) and the ERC20-style token
//! store (balances, allowances and supplies keyed by token contract address).
//! All arithmetic is checked; a failed mutation returns an error and leaves
//! the store untouched.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use alloy_primitives::{keccak256, Address, U256};
use nb_primitives::TokenPair;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::pairs::{PairRef, PairRegistry};

/// Name of the bridge module; the escrow account is derived from it.
pub const MODULE_NAME: &str = "erc20";

/// The module-owned escrow account address, derived deterministically from
/// the module identity.
pub fn module_address() -> Address {
    static ADDR: OnceLock<Address> = OnceLock::new();
    *ADDR.get_or_init(|| Address::from_slice(&keccak256(MODULE_NAME.as_bytes())[12..]))
}

/// Governance-controlled module parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Params {
    /// Global switch for the ERC20 conversion module.
    #[serde(default = "default_enable_erc20")]
    pub enable_erc20: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            enable_erc20: default_enable_erc20(),
        }
    }
}

const fn default_enable_erc20() -> bool {
    true
}

/// Display metadata registered for a native denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// The ledger: the single shared mutable resource of the execution pipeline.
///
/// Cloning takes a snapshot; assigning a snapshot back restores it. That is
/// the revert mechanism used by the precompile dispatch layer.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    bank_balances: BTreeMap<Address, BTreeMap<String, U256>>,
    bank_supplies: BTreeMap<String, U256>,
    erc20_balances: BTreeMap<Address, BTreeMap<Address, U256>>,
    erc20_allowances: BTreeMap<(Address, Address, Address), U256>,
    erc20_supplies: BTreeMap<Address, U256>,
    metadata: BTreeMap<String, TokenMetadata>,
    pairs: PairRegistry,
    params: Params,
}

impl Ledger {
    /// Fresh ledger with default parameters (module enabled).
    pub fn new() -> Self {
        Self::default()
    }

    // === Bank store ===

    /// Native balance of `account` in `denom`.
    pub fn bank_balance(&self, account: &Address, denom: &str) -> U256 {
        self.bank_balances
            .get(account)
            .and_then(|coins| coins.get(denom))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Total native supply of `denom`.
    pub fn bank_supply(&self, denom: &str) -> U256 {
        self.bank_supplies.get(denom).copied().unwrap_or(U256::ZERO)
    }

    /// Creates `amount` of `denom` on `to`, growing the supply.
    pub fn bank_mint(&mut self, to: &Address, denom: &str, amount: U256) -> Result<(), LedgerError> {
        let new_supply = self
            .bank_supply(denom)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        let new_balance = self
            .bank_balance(to, denom)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.bank_supplies.insert(denom.to_string(), new_supply);
        self.set_bank_balance(to, denom, new_balance);
        tracing::debug!(target: "nb_ledger", %to, denom, %amount, "minted native coins");
        Ok(())
    }

    /// Destroys `amount` of `denom` held by `from`, shrinking the supply.
    pub fn bank_burn(
        &mut self,
        from: &Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_balance = self
            .bank_balance(from, denom)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let new_supply = self
            .bank_supply(denom)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;

        self.bank_supplies.insert(denom.to_string(), new_supply);
        self.set_bank_balance(from, denom, new_balance);
        tracing::debug!(target: "nb_ledger", %from, denom, %amount, "burned native coins");
        Ok(())
    }

    /// Moves `amount` of `denom` between accounts. Supply is unchanged.
    pub fn bank_send(
        &mut self,
        from: &Address,
        to: &Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_from = self
            .bank_balance(from, denom)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let new_to = self
            .bank_balance(to, denom)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.set_bank_balance(from, denom, new_from);
        self.set_bank_balance(to, denom, new_to);
        Ok(())
    }

    fn set_bank_balance(&mut self, account: &Address, denom: &str, balance: U256) {
        self.bank_balances
            .entry(*account)
            .or_default()
            .insert(denom.to_string(), balance);
    }

    // === ERC20 token store ===

    /// ERC20 balance of `holder` in `token`.
    pub fn erc20_balance(&self, token: &Address, holder: &Address) -> U256 {
        self.erc20_balances
            .get(token)
            .and_then(|holders| holders.get(holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Total ERC20 supply of `token`.
    pub fn erc20_supply(&self, token: &Address) -> U256 {
        self.erc20_supplies.get(token).copied().unwrap_or(U256::ZERO)
    }

    /// Mints `amount` of `token` to `to`, growing the token supply.
    pub fn erc20_mint(
        &mut self,
        token: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_supply = self
            .erc20_supply(token)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        let new_balance = self
            .erc20_balance(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.erc20_supplies.insert(*token, new_supply);
        self.set_erc20_balance(token, to, new_balance);
        tracing::debug!(target: "nb_ledger", %token, %to, %amount, "minted erc20 tokens");
        Ok(())
    }

    /// Burns `amount` of `token` held by `from`, shrinking the token supply.
    pub fn erc20_burn(
        &mut self,
        token: &Address,
        from: &Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_balance = self
            .erc20_balance(token, from)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        let new_supply = self
            .erc20_supply(token)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;

        self.erc20_supplies.insert(*token, new_supply);
        self.set_erc20_balance(token, from, new_balance);
        tracing::debug!(target: "nb_ledger", %token, %from, %amount, "burned erc20 tokens");
        Ok(())
    }

    /// Moves `amount` of `token` between holders. Supply is unchanged.
    pub fn erc20_transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let new_from = self
            .erc20_balance(token, from)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let new_to = self
            .erc20_balance(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.set_erc20_balance(token, from, new_from);
        self.set_erc20_balance(token, to, new_to);
        Ok(())
    }

    /// Remaining allowance granted by `owner` to `spender` on `token`.
    pub fn erc20_allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256 {
        self.erc20_allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Sets the allowance granted by `owner` to `spender` on `token`.
    pub fn erc20_approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: U256) {
        self.erc20_allowances
            .insert((*token, *owner, *spender), amount);
    }

    /// Debits `amount` from the allowance granted by `owner` to `spender`.
    pub fn erc20_spend_allowance(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let remaining = self
            .erc20_allowance(token, owner, spender)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance)?;
        self.erc20_allowances
            .insert((*token, *owner, *spender), remaining);
        Ok(())
    }

    fn set_erc20_balance(&mut self, token: &Address, holder: &Address, balance: U256) {
        self.erc20_balances
            .entry(*token)
            .or_default()
            .insert(*holder, balance);
    }

    // === Denom metadata ===

    /// Registers display metadata for `denom`.
    pub fn set_denom_metadata(&mut self, denom: impl Into<String>, metadata: TokenMetadata) {
        self.metadata.insert(denom.into(), metadata);
    }

    /// Metadata registered for `denom`, or [`LedgerError::UnknownDenom`].
    pub fn denom_metadata(&self, denom: &str) -> Result<&TokenMetadata, LedgerError> {
        self.metadata
            .get(denom)
            .ok_or_else(|| LedgerError::UnknownDenom(denom.to_string()))
    }

    // === Token pairs ===

    /// Registers a token pair; the governance proposal outcome.
    pub fn register_token_pair(&mut self, pair: TokenPair) -> Result<(), LedgerError> {
        self.pairs.register(pair)
    }

    /// Registers an externally deployed ERC20 contract, deriving its
    /// representation denom from the contract address.
    pub fn register_erc20(&mut self, erc20_address: Address) -> Result<TokenPair, LedgerError> {
        let pair = TokenPair::new_external(erc20_address);
        self.pairs.register(pair.clone())?;
        Ok(pair)
    }

    /// Registers a native coin fronted by a module-owned ERC20 face.
    pub fn register_native_coin(
        &mut self,
        denom: impl Into<String>,
        erc20_address: Address,
    ) -> Result<TokenPair, LedgerError> {
        let pair = TokenPair::new_native(denom, erc20_address);
        self.pairs.register(pair.clone())?;
        Ok(pair)
    }

    /// Resolves a pair reference against the registry.
    pub fn token_pair(&self, pair_ref: &PairRef) -> Result<&TokenPair, LedgerError> {
        self.pairs.resolve(pair_ref)
    }

    /// The pair registry, for enumeration.
    pub fn token_pairs(&self) -> &PairRegistry {
        &self.pairs
    }

    // === Params ===

    /// Current module parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Flips the global ERC20 module switch; a governance outcome.
    pub fn set_erc20_enabled(&mut self, enabled: bool) {
        self.params.enable_erc20 = enabled;
    }
}
