//! Conversion between ERC20 token balances and native ledger coins.
//!
//! Both directions follow the escrow pattern around the module account: for
//! externally-owned pairs the tokens are locked in (or unlocked from) module
//! custody while the representation coin is minted (or burned); for
//! module-owned pairs the module exercises its mint/burn authority on the
//! ERC20 side directly. The escrow account's token balance therefore always
//! equals the outstanding converted principal of externally-owned pairs.
//!
//! Every fallible check runs before the first mutation, so a failed
//! conversion leaves the ledger untouched.

use alloy_primitives::{Address, U256};
use nb_primitives::TokenPair;

use crate::error::LedgerError;
use crate::pairs::PairRef;
use crate::state::{module_address, Ledger};

impl Ledger {
    /// Converts `amount` of an ERC20 token balance into the paired native
    /// coin: lock-and-mint for externally-owned pairs, burn-and-mint for
    /// module-owned pairs.
    pub fn convert_erc20_to_native(
        &mut self,
        pair_ref: &PairRef,
        amount: U256,
        recipient: &Address,
        sender: &Address,
    ) -> Result<TokenPair, LedgerError> {
        if !self.params().enable_erc20 {
            return Err(LedgerError::ModuleDisabled);
        }
        let pair = self.token_pair(pair_ref)?.clone();
        let token = pair.erc20_address;

        // Validation precedes the first mutation.
        if self.erc20_balance(&token, sender) < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        self.bank_supply(&pair.denom)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.bank_balance(recipient, &pair.denom)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        if !pair.is_module_owned() {
            self.erc20_balance(&token, &module_address())
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
        }

        if pair.is_module_owned() {
            self.erc20_burn(&token, sender, amount)?;
        } else {
            self.erc20_transfer(&token, sender, &module_address(), amount)?;
        }
        self.bank_mint(recipient, &pair.denom, amount)?;

        tracing::info!(
            target: "nb_ledger",
            %token,
            denom = %pair.denom,
            %amount,
            %sender,
            %recipient,
            "converted erc20 tokens to native coins"
        );
        Ok(pair)
    }

    /// Converts `amount` of a native coin back into the paired ERC20 token
    /// balance: burn-and-unlock for externally-owned pairs, burn-and-mint for
    /// module-owned pairs.
    pub fn convert_native_to_erc20(
        &mut self,
        pair_ref: &PairRef,
        amount: U256,
        recipient: &Address,
        sender: &Address,
    ) -> Result<TokenPair, LedgerError> {
        if !self.params().enable_erc20 {
            return Err(LedgerError::ModuleDisabled);
        }
        let pair = self.token_pair(pair_ref)?.clone();
        let token = pair.erc20_address;

        // Validation precedes the first mutation.
        if self.bank_balance(sender, &pair.denom) < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        if pair.is_module_owned() {
            self.erc20_supply(&token)
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
        } else if self.erc20_balance(&token, &module_address()) < amount {
            // Escrow can only run short if tokens were created outside the
            // conversion flow; treat it the same as any other overdraft.
            return Err(LedgerError::InsufficientBalance);
        }
        self.erc20_balance(&token, recipient)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.bank_burn(sender, &pair.denom, amount)?;
        if pair.is_module_owned() {
            self.erc20_mint(&token, recipient, amount)?;
        } else {
            self.erc20_transfer(&token, &module_address(), recipient, amount)?;
        }

        tracing::info!(
            target: "nb_ledger",
            %token,
            denom = %pair.denom,
            %amount,
            %sender,
            %recipient,
            "converted native coins to erc20 tokens"
        );
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const AMT: u64 = 100;

    fn external_setup() -> (Ledger, Address, Address) {
        let token = address!("0x00000000000000000000000000000000000000c0");
        let holder = address!("0x00000000000000000000000000000000000000a0");
        let mut ledger = Ledger::new();
        ledger.register_erc20(token).expect("register pair");
        ledger
            .erc20_mint(&token, &holder, U256::from(AMT))
            .expect("fund holder");
        (ledger, token, holder)
    }

    #[test]
    fn erc20_to_native_escrows_on_the_module_account() {
        let (mut ledger, token, holder) = external_setup();

        let pair = ledger
            .convert_erc20_to_native(&PairRef::Erc20(token), U256::from(AMT), &holder, &holder)
            .expect("conversion should succeed");

        assert_eq!(ledger.erc20_balance(&token, &holder), U256::ZERO);
        assert_eq!(
            ledger.erc20_balance(&token, &module_address()),
            U256::from(AMT),
            "principal must sit in module escrow"
        );
        assert_eq!(ledger.bank_balance(&holder, &pair.denom), U256::from(AMT));
        assert_eq!(ledger.bank_supply(&pair.denom), U256::from(AMT));
    }

    #[test]
    fn round_trip_restores_escrow_and_balances() {
        let (mut ledger, token, holder) = external_setup();
        let pair_ref = PairRef::Erc20(token);

        let pair = ledger
            .convert_erc20_to_native(&pair_ref, U256::from(AMT), &holder, &holder)
            .expect("lock and mint");
        ledger
            .convert_native_to_erc20(&pair_ref, U256::from(AMT), &holder, &holder)
            .expect("burn and unlock");

        assert_eq!(ledger.erc20_balance(&token, &holder), U256::from(AMT));
        assert_eq!(
            ledger.erc20_balance(&token, &module_address()),
            U256::ZERO,
            "escrow must return to its pre-conversion value"
        );
        assert_eq!(ledger.bank_balance(&holder, &pair.denom), U256::ZERO);
        assert_eq!(ledger.bank_supply(&pair.denom), U256::ZERO);
    }

    #[test]
    fn module_owned_pair_burns_and_mints_the_erc20_face() {
        let face = address!("0x00000000000000000000000000000000000000c1");
        let holder = address!("0x00000000000000000000000000000000000000a1");
        let mut ledger = Ledger::new();
        ledger
            .register_native_coin("unative", face)
            .expect("register pair");
        ledger
            .bank_mint(&holder, "unative", U256::from(AMT))
            .expect("fund holder");

        ledger
            .convert_native_to_erc20(
                &PairRef::Denom("unative".to_string()),
                U256::from(AMT),
                &holder,
                &holder,
            )
            .expect("native to erc20");
        assert_eq!(ledger.erc20_balance(&face, &holder), U256::from(AMT));
        assert_eq!(ledger.erc20_supply(&face), U256::from(AMT), "minted face");
        assert_eq!(ledger.bank_balance(&holder, "unative"), U256::ZERO);
        assert_eq!(
            ledger.erc20_balance(&face, &module_address()),
            U256::ZERO,
            "module-owned pairs never touch escrow"
        );

        ledger
            .convert_erc20_to_native(
                &PairRef::Erc20(face),
                U256::from(AMT),
                &holder,
                &holder,
            )
            .expect("erc20 back to native");
        assert_eq!(ledger.erc20_supply(&face), U256::ZERO, "face burned");
        assert_eq!(ledger.bank_balance(&holder, "unative"), U256::from(AMT));
    }

    #[test]
    fn disabled_module_performs_zero_mutations() {
        let (mut ledger, token, holder) = external_setup();
        ledger.set_erc20_enabled(false);
        let before = ledger.clone();

        let err = ledger
            .convert_erc20_to_native(&PairRef::Erc20(token), U256::from(AMT), &holder, &holder)
            .expect_err("disabled module must reject");
        assert_eq!(err, LedgerError::ModuleDisabled);

        assert_eq!(
            ledger.erc20_balance(&token, &holder),
            before.erc20_balance(&token, &holder)
        );
        assert_eq!(
            ledger.erc20_balance(&token, &module_address()),
            U256::ZERO,
            "no escrow movement"
        );
    }

    #[test]
    fn unregistered_pair_is_rejected() {
        let (mut ledger, _token, holder) = external_setup();
        let stranger = address!("0x00000000000000000000000000000000000000ff");

        let err = ledger
            .convert_erc20_to_native(&PairRef::Erc20(stranger), U256::from(1), &holder, &holder)
            .expect_err("unknown pair must reject");
        assert!(matches!(err, LedgerError::UnknownPair(_)));
    }

    #[test]
    fn insufficient_erc20_balance_leaves_state_untouched() {
        let (mut ledger, token, holder) = external_setup();

        let err = ledger
            .convert_erc20_to_native(
                &PairRef::Erc20(token),
                U256::from(AMT + 1),
                &holder,
                &holder,
            )
            .expect_err("overdraft must fail");
        assert_eq!(err, LedgerError::InsufficientBalance);
        assert_eq!(ledger.erc20_balance(&token, &holder), U256::from(AMT));
        assert_eq!(ledger.erc20_balance(&token, &module_address()), U256::ZERO);
    }

    #[test]
    fn conversion_can_pay_out_to_a_third_party() {
        let (mut ledger, token, holder) = external_setup();
        let recipient = address!("0x00000000000000000000000000000000000000b9");

        let pair = ledger
            .convert_erc20_to_native(
                &PairRef::Erc20(token),
                U256::from(AMT),
                &recipient,
                &holder,
            )
            .expect("conversion should succeed");
        assert_eq!(ledger.bank_balance(&recipient, &pair.denom), U256::from(AMT));
        assert_eq!(ledger.bank_balance(&holder, &pair.denom), U256::ZERO);
    }
}
