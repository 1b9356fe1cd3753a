//! Call setup, gas settlement and the precompile dispatch seam.
//!
//! A call runs against a [`CallContext`] carrying a bounded [`GasMeter`] and
//! a scratch log buffer. Settlement is unconditional: whatever the dispatch
//! outcome, the gas the context consumed is drained from the caller's
//! [`Contract`] frame before the outcome is reported. Failed calls restore
//! the ledger from the entry snapshot, so a revert or out-of-gas abort is
//! observationally free of side effects.

use alloy_primitives::{Address, Bytes, U256};
use nb_ledger::Ledger;
use nb_primitives::LogEntry;

use crate::abi::{MethodDescriptor, MethodKind};
use crate::error::{PrecompileError, VmError};

/// Bounded gas meter for one precompile call.
///
/// Exhaustion pins `consumed` at the limit, so settlement after a failed
/// consume still drains the full budget from the caller.
#[derive(Clone, Copy, Debug)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub const fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    pub const fn limit(&self) -> u64 {
        self.limit
    }

    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    pub const fn remaining(&self) -> u64 {
        self.limit - self.consumed
    }

    /// Consumes `amount` gas, failing once the limit would be crossed.
    pub fn consume(&mut self, amount: u64) -> Result<(), PrecompileError> {
        match self.consumed.checked_add(amount) {
            Some(total) if total <= self.limit => {
                self.consumed = total;
                Ok(())
            }
            _ => {
                self.consumed = self.limit;
                Err(PrecompileError::OutOfGas)
            }
        }
    }
}

/// The caller-side frame of one precompile invocation.
#[derive(Clone, Debug)]
pub struct Contract<'i> {
    pub caller: Address,
    pub value: U256,
    pub input: &'i [u8],
    gas: u64,
}

impl<'i> Contract<'i> {
    pub const fn new(caller: Address, value: U256, input: &'i [u8], gas: u64) -> Self {
        Self {
            caller,
            value,
            input,
            gas,
        }
    }

    /// Gas left on the frame.
    pub const fn gas(&self) -> u64 {
        self.gas
    }

    /// Drains `amount` from the frame; an overdraft empties the frame and
    /// reports failure.
    pub fn use_gas(&mut self, amount: u64) -> bool {
        match self.gas.checked_sub(amount) {
            Some(rest) => {
                self.gas = rest;
                true
            }
            None => {
                self.gas = 0;
                false
            }
        }
    }
}

/// Per-call execution context handed to dispatched methods.
#[derive(Debug)]
pub struct CallContext<'a> {
    state: &'a mut Ledger,
    /// Events emitted so far in this call, in emission order.
    pub logs: Vec<LogEntry>,
    /// The call's bounded gas meter.
    pub gas: GasMeter,
    pub caller: Address,
    pub value: U256,
    pub input: &'a [u8],
    pub block_height: u64,
    read_only: bool,
}

impl<'a> CallContext<'a> {
    pub fn new(
        state: &'a mut Ledger,
        gas_limit: u64,
        caller: Address,
        value: U256,
        input: &'a [u8],
        block_height: u64,
        read_only: bool,
    ) -> Self {
        Self {
            state,
            logs: Vec::new(),
            gas: GasMeter::new(gas_limit),
            caller,
            value,
            input,
            block_height,
            read_only,
        }
    }

    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn state(&self) -> &Ledger {
        self.state
    }

    /// Mutable ledger access. Setup already rejected mutating methods under
    /// read-only contexts; the assertion backstops that gate.
    pub fn state_mut(&mut self) -> &mut Ledger {
        debug_assert!(!self.read_only, "ledger write under a read-only context");
        self.state
    }
}

/// Rejects mutating methods invoked under a read-only context. Runs during
/// call setup, before any gas is consumed or state is touched.
pub fn ensure_mutability(
    descriptor: &MethodDescriptor,
    read_only: bool,
) -> Result<(), PrecompileError> {
    if read_only && descriptor.kind == MethodKind::Transaction {
        return Err(PrecompileError::Setup(format!(
            "write protection: cannot call {} in a read-only context",
            descriptor.name
        )));
    }
    Ok(())
}

/// Successful outcome of a precompile call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutput {
    /// ABI-encoded return data.
    pub bytes: Bytes,
    /// Events emitted by the call, in emission order.
    pub logs: Vec<LogEntry>,
}

/// A stateful precompiled contract.
pub trait Precompile {
    /// The address the precompile is installed at.
    fn address(&self) -> Address;

    /// Quotes the gas cost of `input` without executing it. Pure.
    fn required_gas(&self, input: &[u8]) -> u64;

    /// Whether the described method mutates state.
    fn is_transaction(&self, descriptor: &MethodDescriptor) -> bool {
        descriptor.kind == MethodKind::Transaction
    }

    /// Executes the call against `ledger`, settling gas on the `contract`
    /// frame on every exit path.
    fn run(
        &self,
        ledger: &mut Ledger,
        contract: &mut Contract<'_>,
        block_height: u64,
        read_only: bool,
    ) -> Result<CallOutput, VmError>;
}

/// Runs `dispatch` inside a fresh [`CallContext`] and settles gas.
///
/// The ledger is snapshotted at entry; any failure restores it wholesale.
/// Settlement runs on every exit path: success, revert and out-of-gas all
/// drain the context's consumed gas from the caller's frame, and a frame
/// that cannot cover the consumption turns the outcome into
/// [`VmError::OutOfGas`].
pub fn run_with_settlement(
    ledger: &mut Ledger,
    contract: &mut Contract<'_>,
    block_height: u64,
    read_only: bool,
    dispatch: impl FnOnce(&mut CallContext<'_>) -> Result<Bytes, PrecompileError>,
) -> Result<CallOutput, VmError> {
    let snapshot = ledger.clone();

    let mut ctx = CallContext::new(
        ledger,
        contract.gas(),
        contract.caller,
        contract.value,
        contract.input,
        block_height,
        read_only,
    );
    let outcome = dispatch(&mut ctx);
    let cost = ctx.gas.consumed();
    let logs = std::mem::take(&mut ctx.logs);
    drop(ctx);

    if !contract.use_gas(cost) {
        *ledger = snapshot;
        return Err(VmError::OutOfGas);
    }
    match outcome {
        Ok(bytes) => Ok(CallOutput { bytes, logs }),
        Err(err) => {
            *ledger = snapshot;
            Err(err.into())
        }
    }
}
