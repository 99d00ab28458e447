//! Chain provider capability trait.

use crate::{
	errors::Result,
	models::{AssetBalance, BlockchainFamily, GasEstimateRequest, TransactionRecord, UniversalAsset},
};
use async_trait::async_trait;

/// The four read-only operations every blockchain family must offer.
///
/// Implementations translate chain-native RPC responses into the normalized
/// data model. They hold a long-lived RPC handle and must be safe to call from
/// many in-flight requests at once.
#[async_trait]
pub trait ChainProvider: Send + Sync {
	/// Id of the network this provider serves.
	fn network_id(&self) -> &str;

	/// Family of the network this provider serves.
	fn family(&self) -> BlockchainFamily;

	/// Reads token metadata for a contract (EVM) or mint (Solana) address.
	async fn get_asset_info(&self, contract_address: &str) -> Result<UniversalAsset>;

	/// Reads a wallet's holdings of the given asset.
	async fn get_balance(&self, contract_address: &str, wallet_address: &str)
		-> Result<AssetBalance>;

	/// Looks up a transaction by hash (EVM) or signature (Solana).
	async fn get_transaction(&self, hash: &str) -> Result<TransactionRecord>;

	/// Prices a native-currency transfer. The returned string is gas units on
	/// EVM chains and lamports per signature on Solana.
	async fn estimate_gas(&self, request: &GasEstimateRequest) -> Result<String>;
}
