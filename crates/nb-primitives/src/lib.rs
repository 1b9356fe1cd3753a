//! Shared data-model types for the native token bridge.
//!
//! A [`TokenPair`] is the registered, immutable association between an
//! ERC20-style contract address and a native ledger denomination. Pairs are
//! created only through the governance-gated registration outcome and are
//! keyed bijectively: exactly one denom per address and vice versa. The
//! registry enforcing that mapping lives in `nb-ledger`.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Prefix of denominations derived from an ERC20 contract address.
pub const ERC20_DENOM_PREFIX: &str = "erc20/";

/// Derives the native denomination representing an ERC20 contract.
///
/// The representation coin for an externally deployed token is named after
/// the contract itself, e.g. `erc20/0xdAC1…1ec7`.
pub fn erc20_denom(address: &Address) -> String {
    format!("{ERC20_DENOM_PREFIX}{address}")
}

/// Ownership class of a registered token pair.
///
/// Module-owned pairs represent native coins whose ERC20 face is backed by
/// module mint/burn authority; externally-owned pairs represent deployed
/// ERC20 contracts whose tokens are held in module escrow while converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairOwner {
    /// The bridge module controls the ERC20 supply (mint/burn).
    Module,
    /// An external contract controls the ERC20 supply (escrow/unescrow).
    External,
}

/// A registered association between an ERC20 contract address and a native
/// denomination. Immutable once registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Address of the ERC20 contract (or of the precompile fronting it).
    pub erc20_address: Address,
    /// Native denomination the contract is paired with.
    pub denom: String,
    /// Who controls the ERC20 supply for this pair.
    pub owner: PairOwner,
}

impl TokenPair {
    /// Pair for an externally deployed ERC20 contract. The denom is derived
    /// from the contract address.
    pub fn new_external(erc20_address: Address) -> Self {
        Self {
            denom: erc20_denom(&erc20_address),
            erc20_address,
            owner: PairOwner::External,
        }
    }

    /// Pair for a native coin fronted by a module-owned ERC20 face at
    /// `erc20_address`.
    pub fn new_native(denom: impl Into<String>, erc20_address: Address) -> Self {
        Self {
            erc20_address,
            denom: denom.into(),
            owner: PairOwner::Module,
        }
    }

    /// Whether the module controls the ERC20 supply of this pair.
    pub fn is_module_owned(&self) -> bool {
        self.owner == PairOwner::Module
    }
}

/// An EVM-compatible log entry produced by a precompile call.
///
/// Append-only within a call; becomes part of the transaction's observable
/// output once the call commits. Reverted calls discard their entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Address of the emitting contract.
    pub address: Address,
    /// Topic 0 is the event signature hash; indexed fields follow in
    /// declaration order.
    pub topics: Vec<B256>,
    /// ABI-encoded non-indexed fields, in declaration order.
    pub data: Bytes,
    /// Height of the block the call executed in.
    pub block_number: u64,
}
