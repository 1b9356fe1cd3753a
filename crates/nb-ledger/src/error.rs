use thiserror::Error;

/// Errors surfaced by ledger mutations and lookups.
///
/// Every variant maps to a revert-with-reason at the EVM boundary; none of
/// them is retried internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The debited account does not hold the required amount.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The spender's allowance does not cover the requested amount.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// A credit would overflow the balance or supply counter.
    #[error("balance overflow")]
    BalanceOverflow,

    /// No token pair is registered under the given address or denom.
    #[error("token pair not registered: {0}")]
    UnknownPair(String),

    /// The ERC20 module is globally disabled by governance.
    #[error("erc20 module is disabled")]
    ModuleDisabled,

    /// Registration would break the bijective address<->denom mapping.
    #[error("token pair already registered: {0}")]
    PairAlreadyRegistered(String),

    /// No metadata is registered for the denom.
    #[error("no metadata registered for denom: {0}")]
    UnknownDenom(String),
}
