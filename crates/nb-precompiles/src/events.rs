//! Event emission into the call's log buffer.
//!
//! Emission is infallible and buffered: logs accumulate on the
//! [`CallContext`] in emission order and are only surfaced with a successful
//! [`CallOutput`](crate::dispatch::CallOutput). Failed calls drop their
//! buffer along with the rest of the context.

use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use nb_primitives::LogEntry;

use crate::dispatch::CallContext;
use crate::{IERC20, IWERC20};

/// Appends a Solidity event to the call's log buffer, attributed to
/// `emitter` and stamped with the context's block height.
pub fn emit_event<E: SolEvent>(ctx: &mut CallContext<'_>, emitter: Address, event: &E) {
    let log = event.encode_log_data();
    ctx.logs.push(LogEntry {
        address: emitter,
        topics: log.topics().to_vec(),
        data: log.data,
        block_number: ctx.block_height,
    });
}

pub fn emit_deposit_event(ctx: &mut CallContext<'_>, emitter: Address, event: &IWERC20::Deposit) {
    emit_event(ctx, emitter, event);
}

pub fn emit_withdrawal_event(
    ctx: &mut CallContext<'_>,
    emitter: Address,
    event: &IWERC20::Withdrawal,
) {
    emit_event(ctx, emitter, event);
}

pub fn emit_transfer_event(ctx: &mut CallContext<'_>, emitter: Address, event: &IERC20::Transfer) {
    emit_event(ctx, emitter, event);
}

pub fn emit_approval_event(ctx: &mut CallContext<'_>, emitter: Address, event: &IERC20::Approval) {
    emit_event(ctx, emitter, event);
}
