//! Chain provider implementations.
//!
//! - **EVM chains**: ERC-20 reads over JSON-RPC via the `evm` module
//! - **Solana**: SPL token reads over JSON-RPC via the `solana` module

pub mod evm;
pub mod solana;
