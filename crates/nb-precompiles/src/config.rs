//! Gas pricing configuration.
//!
//! The fixed deposit/withdraw costs are empirical ceilings inherited from the
//! reference deployment. They are deliberately never measured per call (that
//! keeps gas pricing simulation-stable) and are carried as configuration to
//! be recalibrated, not as inviolable truths.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Gas pricing for the bridge precompiles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GasConfig {
    /// Fixed cost of the deposit transaction (also the receive/fallback path).
    #[serde(default = "default_deposit_gas")]
    pub deposit_gas: u64,
    /// Fixed cost of the withdraw transaction.
    #[serde(default = "default_withdraw_gas")]
    pub withdraw_gas: u64,
    /// Flat cost charged per metered ledger read.
    #[serde(default = "default_read_cost_flat")]
    pub read_cost_flat: u64,
    /// Per-argument-byte cost of the read-class ABI estimator.
    #[serde(default = "default_read_cost_per_byte")]
    pub read_cost_per_byte: u64,
    /// Flat cost charged per metered ledger write.
    #[serde(default = "default_write_cost_flat")]
    pub write_cost_flat: u64,
    /// Per-argument-byte cost of the write-class ABI estimator.
    #[serde(default = "default_write_cost_per_byte")]
    pub write_cost_per_byte: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            deposit_gas: default_deposit_gas(),
            withdraw_gas: default_withdraw_gas(),
            read_cost_flat: default_read_cost_flat(),
            read_cost_per_byte: default_read_cost_per_byte(),
            write_cost_flat: default_write_cost_flat(),
            write_cost_per_byte: default_write_cost_per_byte(),
        }
    }
}

impl GasConfig {
    /// Creates a `GasConfig` from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> eyre::Result<Self> {
        let mut config = Self::default();
        if let Some(value) = env_u64("NB_GAS_DEPOSIT")? {
            config.deposit_gas = value;
        }
        if let Some(value) = env_u64("NB_GAS_WITHDRAW")? {
            config.withdraw_gas = value;
        }
        if let Some(value) = env_u64("NB_GAS_READ_FLAT")? {
            config.read_cost_flat = value;
        }
        if let Some(value) = env_u64("NB_GAS_READ_PER_BYTE")? {
            config.read_cost_per_byte = value;
        }
        if let Some(value) = env_u64("NB_GAS_WRITE_FLAT")? {
            config.write_cost_flat = value;
        }
        if let Some(value) = env_u64("NB_GAS_WRITE_PER_BYTE")? {
            config.write_cost_per_byte = value;
        }
        Ok(config)
    }
}

fn env_u64(name: &str) -> eyre::Result<Option<u64>> {
    std::env::var(name)
        .ok()
        .map(|s| u64::from_str(s.trim()).map_err(|e| eyre::eyre!("invalid {name}: {e}")))
        .transpose()
}

const fn default_deposit_gas() -> u64 {
    23_878
}
const fn default_withdraw_gas() -> u64 {
    9_207
}
const fn default_read_cost_flat() -> u64 {
    1_000
}
const fn default_read_cost_per_byte() -> u64 {
    3
}
const fn default_write_cost_flat() -> u64 {
    2_000
}
const fn default_write_cost_per_byte() -> u64 {
    30
}
