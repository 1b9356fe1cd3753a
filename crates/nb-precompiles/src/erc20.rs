//! The ERC20 token precompile core.
//!
//! Serves the full ERC20 method set for one registered token pair straight
//! from the ledger's token store. Metadata queries answer from the denom
//! metadata registered for the pair; balances, allowances and supply come
//! from the token store keyed by the pair's contract address.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use nb_ledger::Ledger;
use nb_primitives::TokenPair;

use crate::abi::{resolve_erc20, IERC20};
use crate::config::GasConfig;
use crate::dispatch::{
    ensure_mutability, run_with_settlement, CallContext, CallOutput, Contract, Precompile,
};
use crate::error::PrecompileError;
use crate::events::{emit_approval_event, emit_transfer_event};
use crate::gas::GasTable;
use crate::VmError;

/// ERC20 precompile bound to one token pair.
#[derive(Clone, Debug)]
pub struct Erc20Precompile {
    pair: TokenPair,
    gas: GasTable,
}

impl Erc20Precompile {
    pub fn new(pair: TokenPair, config: GasConfig) -> Self {
        Self {
            pair,
            gas: GasTable::new(config),
        }
    }

    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// The token contract address the precompile serves.
    pub const fn token(&self) -> Address {
        self.pair.erc20_address
    }

    pub(crate) const fn gas_table(&self) -> &GasTable {
        &self.gas
    }

    /// Executes one decoded ERC20 call against the context.
    pub(crate) fn dispatch(
        &self,
        ctx: &mut CallContext<'_>,
        call: IERC20::IERC20Calls,
    ) -> Result<Bytes, PrecompileError> {
        let token = self.token();
        match call {
            IERC20::IERC20Calls::name(_) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                let meta = ctx.state().denom_metadata(&self.pair.denom)?;
                Ok(meta.name.abi_encode().into())
            }
            IERC20::IERC20Calls::symbol(_) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                let meta = ctx.state().denom_metadata(&self.pair.denom)?;
                Ok(meta.symbol.abi_encode().into())
            }
            IERC20::IERC20Calls::decimals(_) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                let meta = ctx.state().denom_metadata(&self.pair.denom)?;
                // Widened to the full word; the uint8 return encoding is the
                // same 32-byte word.
                Ok(U256::from(meta.decimals).abi_encode().into())
            }
            IERC20::IERC20Calls::totalSupply(_) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                Ok(ctx.state().erc20_supply(&token).abi_encode().into())
            }
            IERC20::IERC20Calls::balanceOf(call) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                Ok(ctx
                    .state()
                    .erc20_balance(&token, &call.account)
                    .abi_encode()
                    .into())
            }
            IERC20::IERC20Calls::allowance(call) => {
                ctx.gas.consume(self.gas.ledger_read_gas())?;
                Ok(ctx
                    .state()
                    .erc20_allowance(&token, &call.owner, &call.spender)
                    .abi_encode()
                    .into())
            }
            IERC20::IERC20Calls::transfer(call) => {
                ctx.gas.consume(self.gas.ledger_write_gas())?;
                let from = ctx.caller;
                ctx.state_mut()
                    .erc20_transfer(&token, &from, &call.to, call.amount)?;
                emit_transfer_event(
                    ctx,
                    token,
                    &IERC20::Transfer {
                        from,
                        to: call.to,
                        value: call.amount,
                    },
                );
                Ok(true.abi_encode().into())
            }
            IERC20::IERC20Calls::approve(call) => {
                ctx.gas.consume(self.gas.ledger_write_gas())?;
                let owner = ctx.caller;
                ctx.state_mut()
                    .erc20_approve(&token, &owner, &call.spender, call.amount);
                emit_approval_event(
                    ctx,
                    token,
                    &IERC20::Approval {
                        owner,
                        spender: call.spender,
                        value: call.amount,
                    },
                );
                Ok(true.abi_encode().into())
            }
            IERC20::IERC20Calls::transferFrom(call) => {
                // Allowance debit and balance move are two metered writes.
                ctx.gas.consume(self.gas.ledger_write_gas())?;
                ctx.gas.consume(self.gas.ledger_write_gas())?;
                let spender = ctx.caller;
                ctx.state_mut()
                    .erc20_spend_allowance(&token, &call.from, &spender, call.amount)?;
                ctx.state_mut()
                    .erc20_transfer(&token, &call.from, &call.to, call.amount)?;
                emit_transfer_event(
                    ctx,
                    token,
                    &IERC20::Transfer {
                        from: call.from,
                        to: call.to,
                        value: call.amount,
                    },
                );
                Ok(true.abi_encode().into())
            }
        }
    }
}

impl Precompile for Erc20Precompile {
    fn address(&self) -> Address {
        self.token()
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        self.gas.required_gas_erc20(input)
    }

    fn run(
        &self,
        ledger: &mut Ledger,
        contract: &mut Contract<'_>,
        block_height: u64,
        read_only: bool,
    ) -> Result<CallOutput, VmError> {
        run_with_settlement(ledger, contract, block_height, read_only, |ctx| {
            let (descriptor, call) = resolve_erc20(ctx.input)?;
            ensure_mutability(descriptor, ctx.read_only())?;
            self.dispatch(ctx, call)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::{SolCall, SolEvent};
    use nb_ledger::TokenMetadata;

    const SUPPLY: u64 = 1_000;

    fn setup() -> (Erc20Precompile, Ledger, Address) {
        let token = address!("0x00000000000000000000000000000000000000c0");
        let holder = address!("0x00000000000000000000000000000000000000a0");
        let mut ledger = Ledger::new();
        let pair = ledger.register_erc20(token).expect("register pair");
        ledger.set_denom_metadata(
            pair.denom.clone(),
            TokenMetadata {
                name: "Bridged Token".to_string(),
                symbol: "BTK".to_string(),
                decimals: 18,
            },
        );
        ledger
            .erc20_mint(&token, &holder, U256::from(SUPPLY))
            .expect("fund holder");
        (Erc20Precompile::new(pair, GasConfig::default()), ledger, holder)
    }

    fn call(
        precompile: &Erc20Precompile,
        ledger: &mut Ledger,
        caller: Address,
        input: &[u8],
        read_only: bool,
    ) -> Result<CallOutput, VmError> {
        let mut contract = Contract::new(caller, U256::ZERO, input, 1_000_000);
        precompile.run(ledger, &mut contract, 1, read_only)
    }

    #[test]
    fn metadata_queries_answer_from_denom_metadata() {
        let (precompile, mut ledger, holder) = setup();

        let out = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::symbolCall {}.abi_encode(),
            true,
        )
        .expect("symbol query");
        let symbol = String::abi_decode(&out.bytes).expect("decode string");
        assert_eq!(symbol, "BTK");

        let out = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::decimalsCall {}.abi_encode(),
            true,
        )
        .expect("decimals query");
        assert_eq!(
            U256::abi_decode(&out.bytes).expect("decode uint8 word"),
            U256::from(18),
            "uint8 returns travel as a full word"
        );
    }

    #[test]
    fn balance_and_supply_come_from_the_token_store() {
        let (precompile, mut ledger, holder) = setup();

        let out = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::balanceOfCall { account: holder }.abi_encode(),
            true,
        )
        .expect("balance query");
        assert_eq!(
            U256::abi_decode(&out.bytes).expect("decode"),
            U256::from(SUPPLY)
        );

        let out = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::totalSupplyCall {}.abi_encode(),
            true,
        )
        .expect("supply query");
        assert_eq!(
            U256::abi_decode(&out.bytes).expect("decode"),
            U256::from(SUPPLY)
        );
    }

    #[test]
    fn transfer_moves_balance_and_emits_the_event() {
        let (precompile, mut ledger, holder) = setup();
        let to = address!("0x00000000000000000000000000000000000000b0");

        let out = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::transferCall {
                to,
                amount: U256::from(250),
            }
            .abi_encode(),
            false,
        )
        .expect("transfer");

        assert!(bool::abi_decode(&out.bytes).expect("decode bool"));
        assert_eq!(ledger.erc20_balance(&precompile.token(), &to), U256::from(250));
        assert_eq!(out.logs.len(), 1);
        assert_eq!(out.logs[0].address, precompile.token());
        assert_eq!(out.logs[0].topics[0], IERC20::Transfer::SIGNATURE_HASH);
    }

    #[test]
    fn transfer_from_requires_and_debits_allowance() {
        let (precompile, mut ledger, holder) = setup();
        let spender = address!("0x00000000000000000000000000000000000000b1");
        let to = address!("0x00000000000000000000000000000000000000b2");
        let token = precompile.token();

        let input = IERC20::transferFromCall {
            from: holder,
            to,
            amount: U256::from(100),
        }
        .abi_encode();

        let err = call(&precompile, &mut ledger, spender, &input, false)
            .expect_err("no allowance yet");
        assert!(matches!(err, VmError::Revert(_)));
        assert_eq!(ledger.erc20_balance(&token, &to), U256::ZERO, "rolled back");

        ledger.erc20_approve(&token, &holder, &spender, U256::from(150));
        call(&precompile, &mut ledger, spender, &input, false).expect("within allowance");
        assert_eq!(ledger.erc20_balance(&token, &to), U256::from(100));
        assert_eq!(
            ledger.erc20_allowance(&token, &holder, &spender),
            U256::from(50)
        );
    }

    #[test]
    fn transactions_are_rejected_under_read_only() {
        let (precompile, mut ledger, holder) = setup();
        let before = ledger.erc20_balance(&precompile.token(), &holder);

        let err = call(
            &precompile,
            &mut ledger,
            holder,
            &IERC20::approveCall {
                spender: holder,
                amount: U256::from(1),
            }
            .abi_encode(),
            true,
        )
        .expect_err("mutation under read-only");
        assert!(matches!(err, VmError::Revert(_)));
        assert_eq!(ledger.erc20_balance(&precompile.token(), &holder), before);
    }

    #[test]
    fn short_input_is_a_setup_failure_not_a_receive() {
        let (precompile, mut ledger, holder) = setup();
        let err = call(&precompile, &mut ledger, holder, &[0x01, 0x02], false)
            .expect_err("no receive path on the core");
        assert!(matches!(err, VmError::Revert(_)));
    }
}
