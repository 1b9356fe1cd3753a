//! Token pair registry.
//!
//! Pairs are created only through the governance-gated registration outcome
//! and are immutable once registered. The registry maintains a bijective
//! address<->denom mapping: registering a second pair under an already-used
//! address or denom is rejected.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use nb_primitives::TokenPair;

use crate::error::LedgerError;

/// Reference to a registered pair, by either side of the mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairRef {
    /// Look up by the ERC20 contract address.
    Erc20(Address),
    /// Look up by the native denomination.
    Denom(String),
}

impl PairRef {
    fn describe(&self) -> String {
        match self {
            Self::Erc20(addr) => addr.to_string(),
            Self::Denom(denom) => denom.clone(),
        }
    }
}

/// Bijective registry of token pairs.
#[derive(Clone, Debug, Default)]
pub struct PairRegistry {
    by_address: BTreeMap<Address, TokenPair>,
    denom_index: BTreeMap<String, Address>,
}

impl PairRegistry {
    /// Registers a pair, enforcing the bijective mapping.
    pub fn register(&mut self, pair: TokenPair) -> Result<(), LedgerError> {
        if self.by_address.contains_key(&pair.erc20_address) {
            return Err(LedgerError::PairAlreadyRegistered(
                pair.erc20_address.to_string(),
            ));
        }
        if self.denom_index.contains_key(&pair.denom) {
            return Err(LedgerError::PairAlreadyRegistered(pair.denom));
        }

        tracing::debug!(
            target: "nb_ledger",
            address = %pair.erc20_address,
            denom = %pair.denom,
            owner = ?pair.owner,
            "registered token pair"
        );
        self.denom_index
            .insert(pair.denom.clone(), pair.erc20_address);
        self.by_address.insert(pair.erc20_address, pair);
        Ok(())
    }

    /// Pair registered under the given ERC20 address, if any.
    pub fn by_address(&self, address: &Address) -> Option<&TokenPair> {
        self.by_address.get(address)
    }

    /// Pair registered under the given denom, if any.
    pub fn by_denom(&self, denom: &str) -> Option<&TokenPair> {
        self.denom_index
            .get(denom)
            .and_then(|addr| self.by_address.get(addr))
    }

    /// Resolves a [`PairRef`] or fails with [`LedgerError::UnknownPair`].
    pub fn resolve(&self, pair_ref: &PairRef) -> Result<&TokenPair, LedgerError> {
        let found = match pair_ref {
            PairRef::Erc20(addr) => self.by_address(addr),
            PairRef::Denom(denom) => self.by_denom(denom),
        };
        found.ok_or_else(|| LedgerError::UnknownPair(pair_ref.describe()))
    }

    /// Iterates over all registered pairs, ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = &TokenPair> {
        self.by_address.values()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Whether no pair has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use nb_primitives::erc20_denom;

    #[test]
    fn register_and_resolve_both_ways() {
        let addr = address!("0x00000000000000000000000000000000000000e1");
        let mut registry = PairRegistry::default();
        registry
            .register(TokenPair::new_external(addr))
            .expect("registration should succeed");

        let by_addr = registry
            .resolve(&PairRef::Erc20(addr))
            .expect("resolve by address");
        assert_eq!(by_addr.denom, erc20_denom(&addr));

        let by_denom = registry
            .resolve(&PairRef::Denom(erc20_denom(&addr)))
            .expect("resolve by denom");
        assert_eq!(by_denom.erc20_address, addr);
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let addr = address!("0x00000000000000000000000000000000000000e2");
        let mut registry = PairRegistry::default();
        registry
            .register(TokenPair::new_external(addr))
            .expect("first registration");

        let err = registry
            .register(TokenPair::new_native("uother", addr))
            .expect_err("second registration under same address must fail");
        assert!(matches!(err, LedgerError::PairAlreadyRegistered(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_denom_is_rejected() {
        let addr_a = address!("0x00000000000000000000000000000000000000e3");
        let addr_b = address!("0x00000000000000000000000000000000000000e4");
        let mut registry = PairRegistry::default();
        registry
            .register(TokenPair::new_native("unative", addr_a))
            .expect("first registration");

        let err = registry
            .register(TokenPair::new_native("unative", addr_b))
            .expect_err("second registration under same denom must fail");
        assert!(matches!(err, LedgerError::PairAlreadyRegistered(_)));
    }

    #[test]
    fn mapping_stays_bijective_under_mixed_registrations() {
        let mut registry = PairRegistry::default();
        let addrs: Vec<Address> = (1u8..=5)
            .map(|i| {
                let mut bytes = [0u8; 20];
                bytes[19] = i;
                Address::from(bytes)
            })
            .collect();

        for addr in &addrs {
            registry
                .register(TokenPair::new_external(*addr))
                .expect("registration should succeed");
        }
        // Re-registering any of them fails, in any order.
        for addr in addrs.iter().rev() {
            registry
                .register(TokenPair::new_external(*addr))
                .expect_err("duplicate must be rejected");
        }

        assert_eq!(registry.len(), addrs.len());
        for addr in &addrs {
            let pair = registry.by_address(addr).expect("pair exists");
            let back = registry.by_denom(&pair.denom).expect("denom maps back");
            assert_eq!(back.erc20_address, *addr, "mapping must stay bijective");
        }
    }

    #[test]
    fn unknown_pair_reports_the_reference() {
        let registry = PairRegistry::default();
        let err = registry
            .resolve(&PairRef::Denom("missing".to_string()))
            .expect_err("unknown denom");
        assert_eq!(
            err,
            LedgerError::UnknownPair("missing".to_string()),
            "error should carry the unresolved reference"
        );
    }
}
