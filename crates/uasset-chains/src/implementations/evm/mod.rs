//! Ethereum Virtual Machine (EVM) compatible chain providers.
//!
//! Works against any EVM network (Ethereum, Base, Polygon, ...) that exposes a
//! standard JSON-RPC endpoint. Token state is read with `eth_call` against the
//! ERC-20 ABI.

mod abi;
mod client;
mod provider;

pub use client::{AlloyRpcClient, EvmReceipt, EvmRpc, EvmTransaction};
pub use provider::EvmProvider;
