//! Account ledger consumed by the bridge precompiles.
//!
//! The [`Ledger`] is the single shared mutable resource of the execution
//! pipeline: bank balances per denomination, an ERC20-style token store
//! (balances, allowances, supplies), denom metadata, the token pair registry
//! and the module parameters. Execution is strictly sequential, so the ledger
//! is an owned value behind a `&mut` handle; callers that need revert
//! semantics snapshot it (`Clone`) and restore on failure, which unwinds
//! nested effects together exactly like a journaled state would.
//!
//! Conversion between ERC20 balances and native coins (the escrow
//! lock-and-mint / burn-and-unlock flows) lives in [`convert`].

pub mod convert;
pub mod error;
pub mod pairs;
pub mod state;

pub use error::LedgerError;
pub use pairs::{PairRef, PairRegistry};
pub use state::{module_address, Ledger, Params, TokenMetadata, MODULE_NAME};
