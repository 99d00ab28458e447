//! Solana chain provider.
//!
//! SPL mints carry no name or symbol, so every asset is reported as
//! `Solana Token` / `SOL`. The gas estimate is the per-signature fee, a proxy
//! rather than a full fee simulation.

use super::client::SolanaRpc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};
use uasset_types::{
	asset_id,
	errors::{GatewayError, Result},
	units::{format_units, parse_base_units},
	AssetBalance, BlockchainFamily, ChainProvider, GasEstimateRequest, NetworkConfig,
	TransactionRecord, TransactionStatus, UniversalAsset,
};

/// [`ChainProvider`] for the Solana network.
pub struct SolanaProvider {
	network: NetworkConfig,
	client: Arc<dyn SolanaRpc>,
}

impl std::fmt::Debug for SolanaProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SolanaProvider")
			.field("network", &self.network.id)
			.finish()
	}
}

impl SolanaProvider {
	pub fn new(network: NetworkConfig, client: Arc<dyn SolanaRpc>) -> Self {
		Self { network, client }
	}
}

#[async_trait]
impl ChainProvider for SolanaProvider {
	fn network_id(&self) -> &str {
		&self.network.id
	}

	fn family(&self) -> BlockchainFamily {
		BlockchainFamily::Solana
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn get_asset_info(&self, contract_address: &str) -> Result<UniversalAsset> {
		let mint = self
			.client
			.get_mint(contract_address)
			.await?
			.ok_or_else(|| {
				GatewayError::AssetNotFound(format!("Token mint not found: {}", contract_address))
			})?;

		debug!(
			"Read mint {} with {} decimals",
			contract_address, mint.decimals
		);

		Ok(UniversalAsset {
			id: asset_id(&self.network.id, contract_address),
			name: "Solana Token".to_string(),
			symbol: "SOL".to_string(),
			decimals: mint.decimals,
			blockchain_type: BlockchainFamily::Solana,
			network_id: self.network.id.clone(),
			contract_address: contract_address.to_string(),
			underlying_asset: mint.underlying_asset,
			exchange_rate: mint.exchange_rate,
			circulating_supply: mint.supply.clone(),
			total_supply: mint.supply,
			price: None,
			last_updated: Utc::now(),
		})
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn get_balance(
		&self,
		contract_address: &str,
		wallet_address: &str,
	) -> Result<AssetBalance> {
		let (amount, asset) = tokio::try_join!(
			async {
				self.client
					.get_token_balance(wallet_address, contract_address)
					.await
					.map_err(GatewayError::from)
			},
			self.get_asset_info(contract_address),
		)?;

		// No token account for this mint means the wallet holds none of it
		let balance = amount.unwrap_or_else(|| "0".to_string());
		let raw = parse_base_units(&balance).map_err(|e| {
			GatewayError::Provider(format!("Malformed RPC response: token amount {}", e))
		})?;

		Ok(AssetBalance {
			asset_id: asset.id,
			wallet_address: wallet_address.to_string(),
			formatted_balance: format_units(raw, asset.decimals),
			balance,
			last_updated: Utc::now(),
		})
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn get_transaction(&self, hash: &str) -> Result<TransactionRecord> {
		let tx = self
			.client
			.get_transaction(hash)
			.await?
			.ok_or(GatewayError::TransactionNotFound)?;

		let status = if tx.failed {
			TransactionStatus::Failed
		} else {
			TransactionStatus::Confirmed
		};
		let timestamp = tx
			.block_time
			.and_then(|secs| DateTime::from_timestamp(secs, 0))
			.unwrap_or_else(Utc::now);

		let mut keys = tx.account_keys.into_iter();
		Ok(TransactionRecord {
			hash: hash.to_string(),
			from: keys.next().unwrap_or_default(),
			to: keys.next().unwrap_or_default(),
			asset_id: String::new(),
			amount: "0".to_string(),
			blockchain_type: BlockchainFamily::Solana,
			network_id: self.network.id.clone(),
			status,
			block_number: Some(tx.slot),
			timestamp,
		})
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn estimate_gas(&self, request: &GasEstimateRequest) -> Result<String> {
		let fee = self
			.client
			.get_fee_per_signature(&request.from)
			.await
			.map_err(|e| GatewayError::GasEstimationFailed(e.to_string()))?;

		Ok(fee.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::solana::client::{ConfirmedTransaction, MintAccount};
	use crate::utils::RpcError;

	const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
	const OWNER: &str = "11111111111111111111111111111111";

	#[derive(Default)]
	struct MockSolanaRpc {
		mint: Option<MintAccount>,
		token_balance: Option<String>,
		transaction: Option<ConfirmedTransaction>,
		fee: Option<u64>,
	}

	#[async_trait]
	impl SolanaRpc for MockSolanaRpc {
		async fn get_mint(
			&self,
			_mint: &str,
		) -> std::result::Result<Option<MintAccount>, RpcError> {
			Ok(self.mint.clone())
		}

		async fn get_token_balance(
			&self,
			_owner: &str,
			_mint: &str,
		) -> std::result::Result<Option<String>, RpcError> {
			Ok(self.token_balance.clone())
		}

		async fn get_transaction(
			&self,
			_signature: &str,
		) -> std::result::Result<Option<ConfirmedTransaction>, RpcError> {
			Ok(self.transaction.clone())
		}

		async fn get_fee_per_signature(&self, _payer: &str) -> std::result::Result<u64, RpcError> {
			self.fee
				.ok_or_else(|| RpcError::Transport("blockhash not found".to_string()))
		}
	}

	fn usdc() -> MintAccount {
		MintAccount {
			decimals: 6,
			supply: "5000000000".to_string(),
			underlying_asset: None,
			exchange_rate: None,
		}
	}

	fn provider(rpc: MockSolanaRpc) -> SolanaProvider {
		let network = NetworkConfig {
			id: "solana".to_string(),
			name: "Solana".to_string(),
			rpc_url: "http://localhost:8899".to_string(),
			chain_id: None,
			block_explorer: None,
		};
		SolanaProvider::new(network, Arc::new(rpc))
	}

	#[tokio::test]
	async fn test_get_asset_info_from_mint() {
		let provider = provider(MockSolanaRpc {
			mint: Some(MintAccount {
				underlying_asset: Some(OWNER.to_string()),
				exchange_rate: Some("1.01".to_string()),
				..usdc()
			}),
			..Default::default()
		});

		let asset = provider.get_asset_info(MINT).await.unwrap();
		assert_eq!(asset.id, format!("solana-{}", MINT));
		assert_eq!(asset.name, "Solana Token");
		assert_eq!(asset.symbol, "SOL");
		assert_eq!(asset.decimals, 6);
		assert_eq!(asset.total_supply, "5000000000");
		assert_eq!(asset.circulating_supply, "5000000000");
		assert_eq!(asset.blockchain_type, BlockchainFamily::Solana);
		assert_eq!(asset.underlying_asset.as_deref(), Some(OWNER));
		assert_eq!(asset.exchange_rate.as_deref(), Some("1.01"));
	}

	#[tokio::test]
	async fn test_get_asset_info_missing_mint() {
		let provider = provider(MockSolanaRpc::default());

		let err = provider.get_asset_info(MINT).await.unwrap_err();
		assert_eq!(
			err,
			GatewayError::AssetNotFound(format!("Token mint not found: {}", MINT))
		);
	}

	#[tokio::test]
	async fn test_get_balance_without_token_account_is_zero() {
		let provider = provider(MockSolanaRpc {
			mint: Some(usdc()),
			..Default::default()
		});

		let balance = provider.get_balance(MINT, OWNER).await.unwrap();
		assert_eq!(balance.balance, "0");
		assert_eq!(balance.formatted_balance, "0");
		assert_eq!(balance.asset_id, format!("solana-{}", MINT));
	}

	#[tokio::test]
	async fn test_get_balance_scales_by_decimals() {
		let provider = provider(MockSolanaRpc {
			mint: Some(usdc()),
			token_balance: Some("2500000".to_string()),
			..Default::default()
		});

		let balance = provider.get_balance(MINT, OWNER).await.unwrap();
		assert_eq!(balance.balance, "2500000");
		assert_eq!(balance.formatted_balance, "2.5");
	}

	#[tokio::test]
	async fn test_get_transaction_reads_positional_keys() {
		let provider = provider(MockSolanaRpc {
			transaction: Some(ConfirmedTransaction {
				slot: 250_000_000,
				block_time: Some(1_700_000_000),
				account_keys: vec!["payer".to_string(), "recipient".to_string()],
				failed: false,
			}),
			..Default::default()
		});

		let record = provider.get_transaction("sig").await.unwrap();
		assert_eq!(record.from, "payer");
		assert_eq!(record.to, "recipient");
		assert_eq!(record.amount, "0");
		assert_eq!(record.status, TransactionStatus::Confirmed);
		assert_eq!(record.block_number, Some(250_000_000));
		assert_eq!(record.timestamp.timestamp(), 1_700_000_000);
	}

	#[tokio::test]
	async fn test_get_transaction_single_account_failed() {
		let provider = provider(MockSolanaRpc {
			transaction: Some(ConfirmedTransaction {
				slot: 1,
				block_time: None,
				account_keys: vec!["payer".to_string()],
				failed: true,
			}),
			..Default::default()
		});

		let record = provider.get_transaction("sig").await.unwrap();
		assert_eq!(record.to, "");
		assert_eq!(record.status, TransactionStatus::Failed);
	}

	#[tokio::test]
	async fn test_get_transaction_not_found() {
		let provider = provider(MockSolanaRpc::default());

		let err = provider.get_transaction("sig").await.unwrap_err();
		assert_eq!(err, GatewayError::TransactionNotFound);
	}

	#[tokio::test]
	async fn test_estimate_gas_returns_signature_fee() {
		let request = GasEstimateRequest {
			from: OWNER.to_string(),
			to: MINT.to_string(),
			amount: "1".to_string(),
		};

		let gas = provider(MockSolanaRpc {
			fee: Some(5000),
			..Default::default()
		})
		.estimate_gas(&request)
		.await
		.unwrap();
		assert_eq!(gas, "5000");

		let err = provider(MockSolanaRpc::default())
			.estimate_gas(&request)
			.await
			.unwrap_err();
		assert_eq!(
			err.to_string(),
			"Failed to estimate gas: blockhash not found"
		);
	}
}
