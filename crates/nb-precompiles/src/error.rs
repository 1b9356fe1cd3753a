//! Error taxonomy and the revert adapter.
//!
//! Every dispatch failure except gas exhaustion is adapted into EVM
//! revert-return bytes carrying a human-readable reason, mirroring the
//! standard `Error(string)` encoding. [`PrecompileError::OutOfGas`] bypasses
//! the adapter entirely and propagates as the distinct terminal
//! [`VmError::OutOfGas`].

use alloy_primitives::{hex, Bytes};
use alloy_sol_types::{Revert, SolError};
use nb_ledger::LedgerError;
use thiserror::Error;

/// Failures raised while dispatching a precompile call.
///
/// Ledger rejections (insufficient balance, unknown pair, disabled module)
/// are carried through transparently; they surface to the EVM caller with
/// the ledger's own reason string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PrecompileError {
    /// The first four input bytes match no registered method.
    #[error("unknown method selector: 0x{}", hex::encode(.0))]
    UnknownSelector([u8; 4]),

    /// Argument decoding failed, or a mutating method was invoked under a
    /// read-only context.
    #[error("invalid call setup: {0}")]
    Setup(String),

    /// The bounded gas meter of the current call is exhausted. Terminal;
    /// never adapted into revert data.
    #[error("out of gas")]
    OutOfGas,

    /// A ledger mutation or lookup was rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Terminal outcome of a precompile call that did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VmError {
    /// Execution reverted: every ledger mutation since call entry has been
    /// unrolled and the payload is the ABI-encoded revert reason.
    #[error("execution reverted")]
    Revert(Bytes),

    /// The caller's gas budget cannot cover the call. Unconditional abort of
    /// the current call frame; no revert-reason encoding, no refund.
    #[error("out of gas")]
    OutOfGas,
}

/// Adapts a dispatch failure into `Error(string)` revert-return bytes.
///
/// Must not be fed [`PrecompileError::OutOfGas`]; gas exhaustion is reported
/// through [`VmError::OutOfGas`] instead.
pub fn revert_bytes(err: &PrecompileError) -> Bytes {
    debug_assert!(
        !matches!(err, PrecompileError::OutOfGas),
        "out-of-gas must not be encoded as revert data"
    );
    Revert::from(err.to_string()).abi_encode().into()
}

impl From<PrecompileError> for VmError {
    fn from(err: PrecompileError) -> Self {
        match err {
            PrecompileError::OutOfGas => Self::OutOfGas,
            other => Self::Revert(revert_bytes(&other)),
        }
    }
}
