//! Chain providers for the blockchains the gateway can query.
//!
//! This crate implements the `ChainProvider` trait for each supported
//! blockchain family and keeps the registry that maps network ids to their
//! provider.
//!
//! # Architecture
//!
//! - `registry`: the `ProviderManager`, a read-mostly map from network id to
//!   configuration and provider that can be mutated at runtime
//! - `factory`: builds the right provider for a network configuration
//! - `implementations`: EVM and Solana providers, each split into a thin RPC
//!   client seam and the translation into the gateway's data model
//! - `utils`: RPC error type and the per-call timeout helper

pub mod factory;
pub mod implementations;
pub mod registry;
pub mod utils;

pub use factory::{ProviderFactory, RpcProviderFactory};
pub use implementations::{evm::EvmProvider, solana::SolanaProvider};
pub use registry::{NetworkEntry, ProviderManager};
pub use utils::{RpcError, DEFAULT_RPC_TIMEOUT};
