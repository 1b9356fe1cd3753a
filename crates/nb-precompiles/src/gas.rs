//! Static gas pricing for precompile calls.
//!
//! `required_gas_*` are pure functions of the input bytes and the configured
//! prices: the same input always quotes the same cost, independent of ledger
//! state. Quoting happens before dispatch and never consumes anything itself.

use crate::abi::{selector_of, MethodKind, ERC20_REGISTRY, WERC20_REGISTRY};
use crate::config::GasConfig;
use crate::IWERC20;
use alloy_sol_types::SolCall;

/// Selector-keyed gas quoting backed by a [`GasConfig`].
#[derive(Clone, Debug, Default)]
pub struct GasTable {
    config: GasConfig,
}

impl GasTable {
    pub const fn new(config: GasConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &GasConfig {
        &self.config
    }

    /// Flat cost charged when a dispatched method reads ledger state.
    pub const fn ledger_read_gas(&self) -> u64 {
        self.config.read_cost_flat
    }

    /// Flat cost charged when a dispatched method writes ledger state.
    pub const fn ledger_write_gas(&self) -> u64 {
        self.config.write_cost_flat
    }

    /// Quotes the wrapped-native interface: fixed prices for the
    /// deposit/withdraw extension (short input is the receive path, priced as
    /// a deposit), the ERC20 estimator for the inherited set.
    pub fn required_gas_werc20(&self, input: &[u8]) -> u64 {
        let Some(selector) = selector_of(input) else {
            return self.config.deposit_gas;
        };
        if selector == IWERC20::depositCall::SELECTOR {
            return self.config.deposit_gas;
        }
        if selector == IWERC20::withdrawCall::SELECTOR {
            return self.config.withdraw_gas;
        }
        self.required_gas_erc20(input)
    }

    /// Quotes the plain ERC20 interface from the method's mutability class
    /// and the argument length. Unregistered selectors quote zero; the
    /// failure is reported at dispatch, not here.
    pub fn required_gas_erc20(&self, input: &[u8]) -> u64 {
        let Some(selector) = selector_of(input) else {
            return 0;
        };
        let Some(descriptor) = ERC20_REGISTRY
            .by_selector(selector)
            .or_else(|| WERC20_REGISTRY.by_selector(selector))
        else {
            return 0;
        };
        let arg_len = (input.len() - 4) as u64;
        match descriptor.kind {
            MethodKind::Query => self
                .config
                .read_cost_flat
                .saturating_add(self.config.read_cost_per_byte.saturating_mul(arg_len)),
            MethodKind::Transaction => self
                .config
                .write_cost_flat
                .saturating_add(self.config.write_cost_per_byte.saturating_mul(arg_len)),
        }
    }
}
