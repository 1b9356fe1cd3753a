//! Precompiled contract execution framework and wrapped-native token bridge.
//!
//! | Module | Role |
//! |---|---|
//! | [`abi`] | Interface definitions, selector registry, call resolution |
//! | [`config`] | Gas pricing configuration |
//! | [`gas`] | Static per-selector gas quoting |
//! | [`dispatch`] | Call setup, gas settlement, the [`Precompile`] trait |
//! | [`events`] | Buffered Solidity event emission |
//! | [`error`] | Error taxonomy and the revert adapter |
//! | [`erc20`] | ERC20 token precompile core |
//! | [`werc20`] | Wrapped-native precompile (deposit/withdraw extension) |
//!
//! Calls run inside [`run_with_settlement`](dispatch::run_with_settlement):
//! the ledger is snapshotted at entry, dispatch consumes from a bounded
//! meter, and the consumed gas is drained from the caller's frame on every
//! exit path. Failure restores the snapshot, so reverted and aborted calls
//! leave no state behind.

pub mod abi;
pub mod config;
pub mod dispatch;
pub mod erc20;
pub mod error;
pub mod events;
pub mod gas;
pub mod werc20;

pub use abi::{
    resolve_erc20, resolve_werc20, MethodDescriptor, MethodKind, MethodRegistry, ResolvedCall,
    ERC20_REGISTRY, IERC20, IWERC20, WERC20_REGISTRY,
};
pub use config::GasConfig;
pub use dispatch::{
    ensure_mutability, run_with_settlement, CallContext, CallOutput, Contract, GasMeter,
    Precompile,
};
pub use erc20::Erc20Precompile;
pub use error::{revert_bytes, PrecompileError, VmError};
pub use events::{
    emit_approval_event, emit_deposit_event, emit_event, emit_transfer_event,
    emit_withdrawal_event,
};
pub use gas::GasTable;
pub use werc20::Werc20Precompile;
