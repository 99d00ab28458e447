//! Solana chain provider.
//!
//! Reads SPL mint and token accounts through the `jsonParsed` JSON-RPC
//! encoding, so no Solana SDK is required.

mod client;
mod provider;

pub use client::{ConfirmedTransaction, HttpSolanaClient, MintAccount, SolanaRpc};
pub use provider::SolanaProvider;
