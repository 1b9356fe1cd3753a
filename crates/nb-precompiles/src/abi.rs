//! ABI registry: interface definitions, selector tables and resolution.
//!
//! The interface is a versioned, append-only binary contract: changing the
//! meaning of an existing selector breaks consensus compatibility. Mutability
//! is a static property of each method descriptor, never inferred from
//! arguments. Resolution is a pure lookup/decode with no side effects.

use alloy_sol_types::{sol, SolCall, SolInterface};

use crate::error::PrecompileError;

sol! {
    /// ERC20 method set served by the token precompile core.
    #[sol(all_derives)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }

    /// Wrapped-native extension methods layered over the ERC20 core.
    #[sol(all_derives)]
    interface IWERC20 {
        event Deposit(address indexed dst, uint256 wad);
        event Withdrawal(address indexed src, uint256 wad);

        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }
}

/// Mutability class of a method. A static property of the descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    /// State-mutating; rejected under read-only contexts.
    Transaction,
    /// Read-only passthrough query.
    Query,
}

/// Static description of one registered method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub signature: &'static str,
    pub selector: [u8; 4],
    pub kind: MethodKind,
}

/// Descriptor for the selector-less receive path; routed to deposit.
pub const RECEIVE: MethodDescriptor = MethodDescriptor {
    name: "receive",
    signature: "receive()",
    selector: [0; 4],
    kind: MethodKind::Transaction,
};

/// Descriptor for the bytecode fallback path (unknown selector with attached
/// value); routed to deposit.
pub const FALLBACK: MethodDescriptor = MethodDescriptor {
    name: "fallback",
    signature: "fallback()",
    selector: [0; 4],
    kind: MethodKind::Transaction,
};

static ERC20_METHODS: [MethodDescriptor; 9] = [
    MethodDescriptor {
        name: "name",
        signature: IERC20::nameCall::SIGNATURE,
        selector: IERC20::nameCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "symbol",
        signature: IERC20::symbolCall::SIGNATURE,
        selector: IERC20::symbolCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "decimals",
        signature: IERC20::decimalsCall::SIGNATURE,
        selector: IERC20::decimalsCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "totalSupply",
        signature: IERC20::totalSupplyCall::SIGNATURE,
        selector: IERC20::totalSupplyCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "balanceOf",
        signature: IERC20::balanceOfCall::SIGNATURE,
        selector: IERC20::balanceOfCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "transfer",
        signature: IERC20::transferCall::SIGNATURE,
        selector: IERC20::transferCall::SELECTOR,
        kind: MethodKind::Transaction,
    },
    MethodDescriptor {
        name: "allowance",
        signature: IERC20::allowanceCall::SIGNATURE,
        selector: IERC20::allowanceCall::SELECTOR,
        kind: MethodKind::Query,
    },
    MethodDescriptor {
        name: "approve",
        signature: IERC20::approveCall::SIGNATURE,
        selector: IERC20::approveCall::SELECTOR,
        kind: MethodKind::Transaction,
    },
    MethodDescriptor {
        name: "transferFrom",
        signature: IERC20::transferFromCall::SIGNATURE,
        selector: IERC20::transferFromCall::SELECTOR,
        kind: MethodKind::Transaction,
    },
];

static WERC20_METHODS: [MethodDescriptor; 2] = [
    MethodDescriptor {
        name: "deposit",
        signature: IWERC20::depositCall::SIGNATURE,
        selector: IWERC20::depositCall::SELECTOR,
        kind: MethodKind::Transaction,
    },
    MethodDescriptor {
        name: "withdraw",
        signature: IWERC20::withdrawCall::SIGNATURE,
        selector: IWERC20::withdrawCall::SELECTOR,
        kind: MethodKind::Transaction,
    },
];

/// Immutable selector-to-descriptor table for one interface.
#[derive(Clone, Copy, Debug)]
pub struct MethodRegistry {
    methods: &'static [MethodDescriptor],
}

/// Registry of the ERC20 core methods.
pub const ERC20_REGISTRY: MethodRegistry = MethodRegistry {
    methods: &ERC20_METHODS,
};

/// Registry of the wrapped-native extension methods.
pub const WERC20_REGISTRY: MethodRegistry = MethodRegistry {
    methods: &WERC20_METHODS,
};

impl MethodRegistry {
    /// Descriptor registered under the given selector, if any.
    pub fn by_selector(&self, selector: [u8; 4]) -> Option<&'static MethodDescriptor> {
        self.methods.iter().find(|m| m.selector == selector)
    }

    /// All registered descriptors, in declaration order.
    pub fn methods(&self) -> &'static [MethodDescriptor] {
        self.methods
    }
}

/// First four input bytes, or `None` for the receive path.
pub fn selector_of(input: &[u8]) -> Option<[u8; 4]> {
    input.get(..4).map(|bytes| {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(bytes);
        selector
    })
}

/// A call resolved against the wrapped-native interface.
#[derive(Clone, Debug)]
pub enum ResolvedCall {
    /// Input shorter than four bytes: the receive path.
    Receive,
    /// A wrapped-native extension method.
    Werc20(&'static MethodDescriptor, IWERC20::IWERC20Calls),
    /// An inherited ERC20 core method.
    Erc20(&'static MethodDescriptor, IERC20::IERC20Calls),
}

/// Resolves raw input against the wrapped-native interface (extension
/// methods first, then the inherited ERC20 set).
pub fn resolve_werc20(input: &[u8]) -> Result<ResolvedCall, PrecompileError> {
    let Some(selector) = selector_of(input) else {
        return Ok(ResolvedCall::Receive);
    };

    if let Some(descriptor) = WERC20_REGISTRY.by_selector(selector) {
        let call = IWERC20::IWERC20Calls::abi_decode(input)
            .map_err(|err| PrecompileError::Setup(err.to_string()))?;
        return Ok(ResolvedCall::Werc20(descriptor, call));
    }
    if let Some(descriptor) = ERC20_REGISTRY.by_selector(selector) {
        let call = IERC20::IERC20Calls::abi_decode(input)
            .map_err(|err| PrecompileError::Setup(err.to_string()))?;
        return Ok(ResolvedCall::Erc20(descriptor, call));
    }
    Err(PrecompileError::UnknownSelector(selector))
}

/// Resolves raw input against the plain ERC20 interface. The core has no
/// receive path, so short input is a setup failure.
pub fn resolve_erc20(
    input: &[u8],
) -> Result<(&'static MethodDescriptor, IERC20::IERC20Calls), PrecompileError> {
    let selector = selector_of(input)
        .ok_or_else(|| PrecompileError::Setup("input shorter than a selector".to_string()))?;
    let descriptor = ERC20_REGISTRY
        .by_selector(selector)
        .ok_or(PrecompileError::UnknownSelector(selector))?;
    let call = IERC20::IERC20Calls::abi_decode(input)
        .map_err(|err| PrecompileError::Setup(err.to_string()))?;
    Ok((descriptor, call))
}
