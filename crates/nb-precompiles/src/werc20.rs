//! The wrapped-native token precompile.
//!
//! Layers the deposit/withdraw extension over the ERC20 core. Wrapping is a
//! representation change, not value creation: deposit credits wrapped tokens
//! against native value already moved onto the precompile account by the
//! host's value transfer, withdraw burns wrapped tokens and pays the native
//! coin back out of that account. Native supply is never minted or burned
//! here.

use alloy_primitives::{Address, Bytes, U256};
use nb_ledger::Ledger;
use nb_primitives::TokenPair;

use crate::abi::{resolve_werc20, ResolvedCall, FALLBACK, IWERC20, RECEIVE};
use crate::config::GasConfig;
use crate::dispatch::{
    ensure_mutability, run_with_settlement, CallContext, CallOutput, Contract, Precompile,
};
use crate::erc20::Erc20Precompile;
use crate::error::{PrecompileError, VmError};
use crate::events::{emit_deposit_event, emit_withdrawal_event};

/// Wrapped-native precompile: the ERC20 core plus deposit/withdraw.
#[derive(Clone, Debug)]
pub struct Werc20Precompile {
    erc20: Erc20Precompile,
}

impl Werc20Precompile {
    pub fn new(pair: TokenPair, config: GasConfig) -> Self {
        Self {
            erc20: Erc20Precompile::new(pair, config),
        }
    }

    pub const fn pair(&self) -> &TokenPair {
        self.erc20.pair()
    }

    pub const fn token(&self) -> Address {
        self.erc20.token()
    }

    /// Wraps the attached native value: mints wrapped tokens to the caller.
    /// The host's value transfer has already moved the native coin onto the
    /// precompile account, so only the wrapped representation changes here.
    fn deposit(&self, ctx: &mut CallContext<'_>) -> Result<Bytes, PrecompileError> {
        ctx.gas.consume(self.erc20.gas_table().ledger_write_gas())?;
        let token = self.token();
        let dst = ctx.caller;
        let wad = ctx.value;

        ctx.state_mut().erc20_mint(&token, &dst, wad)?;
        emit_deposit_event(ctx, token, &IWERC20::Deposit { dst, wad });
        tracing::debug!(target: "nb_precompiles", %token, %dst, %wad, "wrapped native value");
        Ok(Bytes::new())
    }

    /// Unwraps `wad`: burns the caller's wrapped tokens and pays the native
    /// coin back from the precompile account.
    fn withdraw(&self, ctx: &mut CallContext<'_>, wad: U256) -> Result<Bytes, PrecompileError> {
        ctx.gas.consume(self.erc20.gas_table().ledger_write_gas())?;
        let token = self.token();
        let src = ctx.caller;
        let denom = self.pair().denom.clone();

        ctx.state_mut().erc20_burn(&token, &src, wad)?;
        ctx.state_mut().bank_send(&token, &src, &denom, wad)?;
        emit_withdrawal_event(ctx, token, &IWERC20::Withdrawal { src, wad });
        tracing::debug!(target: "nb_precompiles", %token, %src, %wad, "unwrapped native value");
        Ok(Bytes::new())
    }
}

impl Precompile for Werc20Precompile {
    fn address(&self) -> Address {
        self.token()
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        self.erc20.gas_table().required_gas_werc20(input)
    }

    fn run(
        &self,
        ledger: &mut Ledger,
        contract: &mut Contract<'_>,
        block_height: u64,
        read_only: bool,
    ) -> Result<CallOutput, VmError> {
        run_with_settlement(ledger, contract, block_height, read_only, |ctx| {
            match resolve_werc20(ctx.input) {
                Ok(ResolvedCall::Receive) => {
                    ensure_mutability(&RECEIVE, ctx.read_only())?;
                    self.deposit(ctx)
                }
                Ok(ResolvedCall::Werc20(descriptor, call)) => {
                    ensure_mutability(descriptor, ctx.read_only())?;
                    match call {
                        IWERC20::IWERC20Calls::deposit(_) => self.deposit(ctx),
                        IWERC20::IWERC20Calls::withdraw(call) => self.withdraw(ctx, call.wad),
                    }
                }
                Ok(ResolvedCall::Erc20(descriptor, call)) => {
                    ensure_mutability(descriptor, ctx.read_only())?;
                    self.erc20.dispatch(ctx, call)
                }
                // Unknown selector with attached value behaves like contract
                // bytecode hitting its fallback: the value is wrapped.
                Err(PrecompileError::UnknownSelector(_)) if !ctx.value.is_zero() => {
                    ensure_mutability(&FALLBACK, ctx.read_only())?;
                    self.deposit(ctx)
                }
                Err(err) => Err(err),
            }
        })
    }
}
