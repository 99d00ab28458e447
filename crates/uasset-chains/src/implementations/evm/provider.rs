//! EVM chain provider.
//!
//! Reads ERC-20 state through `eth_call` and translates the results into the
//! gateway's data model. Asset names are prefixed with `Universal ` and symbols
//! with `u` to mark the response as a synthetic wrapped-asset view.

use super::{abi::IERC20, client::EvmRpc};
use alloy::{
	primitives::{utils::parse_ether, Address, Bytes, B256},
	sol_types::SolCall,
};
use async_trait::async_trait;
use chrono::Utc;
use std::{str::FromStr, sync::Arc};
use tracing::{debug, instrument};
use uasset_types::{
	asset_id,
	errors::{GatewayError, Result},
	units::format_units,
	AssetBalance, BlockchainFamily, ChainProvider, GasEstimateRequest, NetworkConfig,
	TransactionRecord, TransactionStatus, UniversalAsset,
};

/// [`ChainProvider`] for any EVM-compatible network.
pub struct EvmProvider {
	network: NetworkConfig,
	client: Arc<dyn EvmRpc>,
}

impl std::fmt::Debug for EvmProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EvmProvider")
			.field("network", &self.network.id)
			.finish()
	}
}

impl EvmProvider {
	pub fn new(network: NetworkConfig, client: Arc<dyn EvmRpc>) -> Self {
		Self { network, client }
	}

	/// Performs one ERC-20 view call and decodes its return value.
	async fn view<C: SolCall>(&self, contract: Address, call: C) -> Result<C::Return> {
		let output = self
			.client
			.call(contract, Bytes::from(call.abi_encode()))
			.await?;

		if output.is_empty() {
			return Err(GatewayError::AssetNotFound(format!(
				"No ERC-20 contract found at {}",
				contract
			)));
		}

		C::abi_decode_returns(&output).map_err(|e| {
			GatewayError::Provider(format!(
				"Malformed RPC response: cannot decode {} from {}: {}",
				C::SIGNATURE,
				contract,
				e
			))
		})
	}
}

fn parse_address(value: &str, field: &str) -> Result<Address> {
	Address::from_str(value)
		.map_err(|_| GatewayError::Validation(format!("Invalid {} address: {}", field, value)))
}

#[async_trait]
impl ChainProvider for EvmProvider {
	fn network_id(&self) -> &str {
		&self.network.id
	}

	fn family(&self) -> BlockchainFamily {
		BlockchainFamily::Evm
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn get_asset_info(&self, contract_address: &str) -> Result<UniversalAsset> {
		let contract = parse_address(contract_address, "contract")?;

		let (name, symbol, decimals, total_supply) = tokio::try_join!(
			self.view(contract, IERC20::nameCall {}),
			self.view(contract, IERC20::symbolCall {}),
			self.view(contract, IERC20::decimalsCall {}),
			self.view(contract, IERC20::totalSupplyCall {}),
		)?;

		debug!(
			"Read ERC-20 {} ({}) with {} decimals",
			name, symbol, decimals
		);

		let total_supply = total_supply.to_string();
		Ok(UniversalAsset {
			id: asset_id(&self.network.id, contract_address),
			name: format!("Universal {}", name),
			symbol: format!("u{}", symbol),
			decimals,
			blockchain_type: BlockchainFamily::Evm,
			network_id: self.network.id.clone(),
			contract_address: contract_address.to_string(),
			// A plain ERC-20 ABI exposes neither field
			underlying_asset: None,
			exchange_rate: None,
			circulating_supply: total_supply.clone(),
			total_supply,
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
		let contract = parse_address(contract_address, "contract")?;
		let owner = parse_address(wallet_address, "wallet")?;

		let (raw, asset) = tokio::try_join!(
			self.view(contract, IERC20::balanceOfCall { owner }),
			self.get_asset_info(contract_address),
		)?;

		Ok(AssetBalance {
			asset_id: asset.id,
			wallet_address: wallet_address.to_string(),
			balance: raw.to_string(),
			formatted_balance: format_units(raw, asset.decimals),
			last_updated: Utc::now(),
		})
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn get_transaction(&self, hash: &str) -> Result<TransactionRecord> {
		let tx_hash = B256::from_str(hash)
			.map_err(|_| GatewayError::Validation(format!("Invalid transaction hash: {}", hash)))?;

		let (tx, receipt) = tokio::try_join!(
			self.client.get_transaction(tx_hash),
			self.client.get_transaction_receipt(tx_hash),
		)?;
		let tx = tx.ok_or(GatewayError::TransactionNotFound)?;

		let status = match &receipt {
			Some(receipt) if receipt.success => TransactionStatus::Confirmed,
			_ => TransactionStatus::Failed,
		};
		// Some nodes omit blockNumber on the transaction object once it is mined.
		let block_number = tx
			.block_number
			.or_else(|| receipt.and_then(|receipt| receipt.block_number));

		Ok(TransactionRecord {
			hash: hash.to_string(),
			from: tx.from.to_checksum(None),
			to: tx.to.map(|to| to.to_checksum(None)).unwrap_or_default(),
			asset_id: String::new(),
			amount: tx.value.to_string(),
			blockchain_type: BlockchainFamily::Evm,
			network_id: self.network.id.clone(),
			status,
			block_number,
			timestamp: Utc::now(),
		})
	}

	#[instrument(skip(self), fields(network = %self.network.id))]
	async fn estimate_gas(&self, request: &GasEstimateRequest) -> Result<String> {
		let from = parse_address(&request.from, "'from'")?;
		let to = parse_address(&request.to, "'to'")?;
		let value = parse_ether(&request.amount)
			.map_err(|e| GatewayError::GasEstimationFailed(e.to_string()))?;

		let gas = self
			.client
			.estimate_gas(from, to, value)
			.await
			.map_err(|e| GatewayError::GasEstimationFailed(e.to_string()))?;

		Ok(gas.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::evm::client::{EvmReceipt, EvmTransaction};
	use crate::utils::RpcError;
	use alloy::{
		primitives::U256,
		sol_types::{sol_data, SolCall, SolType, SolValue},
	};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Mutex;

	const TOKEN: &str = "0x0000000000000000000000000000000000000000";
	const WALLET: &str = "0x1111111111111111111111111111111111111111";

	/// Scripted ERC-20 node.
	#[derive(Default)]
	struct MockEvmRpc {
		calls: AtomicUsize,
		balance: U256,
		empty_code: bool,
		transaction: Option<EvmTransaction>,
		receipt: Option<EvmReceipt>,
		estimate_error: Option<String>,
		estimated_value: Mutex<Option<U256>>,
	}

	#[async_trait]
	impl EvmRpc for MockEvmRpc {
		async fn call(&self, _to: Address, input: Bytes) -> std::result::Result<Bytes, RpcError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.empty_code {
				return Ok(Bytes::new());
			}
			let selector: [u8; 4] = input[..4].try_into().unwrap();
			let output = match selector {
				IERC20::nameCall::SELECTOR => "Token".to_string().abi_encode(),
				IERC20::symbolCall::SELECTOR => "TKN".to_string().abi_encode(),
				IERC20::decimalsCall::SELECTOR => <sol_data::Uint<8> as SolType>::abi_encode(&18u8),
				IERC20::totalSupplyCall::SELECTOR => U256::from(1000u64).abi_encode(),
				IERC20::balanceOfCall::SELECTOR => self.balance.abi_encode(),
				_ => return Err(RpcError::Transport("execution reverted".into())),
			};
			Ok(Bytes::from(output))
		}

		async fn get_transaction(
			&self,
			_hash: B256,
		) -> std::result::Result<Option<EvmTransaction>, RpcError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(self.transaction.clone())
		}

		async fn get_transaction_receipt(
			&self,
			_hash: B256,
		) -> std::result::Result<Option<EvmReceipt>, RpcError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(self.receipt.clone())
		}

		async fn estimate_gas(
			&self,
			_from: Address,
			_to: Address,
			value: U256,
		) -> std::result::Result<u64, RpcError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			*self.estimated_value.lock().unwrap() = Some(value);
			match &self.estimate_error {
				Some(message) => Err(RpcError::Transport(message.clone())),
				None => Ok(21_000),
			}
		}
	}

	fn network() -> NetworkConfig {
		NetworkConfig {
			id: "ethereum".to_string(),
			name: "Ethereum Mainnet".to_string(),
			rpc_url: "http://localhost:8545".to_string(),
			chain_id: Some(1),
			block_explorer: None,
		}
	}

	fn provider(rpc: MockEvmRpc) -> (EvmProvider, Arc<MockEvmRpc>) {
		let rpc = Arc::new(rpc);
		(EvmProvider::new(network(), rpc.clone()), rpc)
	}

	#[tokio::test]
	async fn test_get_asset_info_marks_universal_view() {
		let (provider, rpc) = provider(MockEvmRpc::default());

		let asset = provider.get_asset_info(TOKEN).await.unwrap();
		assert_eq!(asset.id, format!("ethereum-{}", TOKEN));
		assert_eq!(asset.name, "Universal Token");
		assert_eq!(asset.symbol, "uTKN");
		assert_eq!(asset.decimals, 18);
		assert_eq!(asset.total_supply, "1000");
		assert_eq!(asset.circulating_supply, "1000");
		assert_eq!(asset.blockchain_type, BlockchainFamily::Evm);
		assert!(asset.underlying_asset.is_none());
		assert!(asset.exchange_rate.is_none());
		assert_eq!(rpc.calls.load(Ordering::SeqCst), 4);
	}

	#[tokio::test]
	async fn test_get_asset_info_without_contract_code() {
		let (provider, _) = provider(MockEvmRpc {
			empty_code: true,
			..Default::default()
		});

		let err = provider.get_asset_info(TOKEN).await.unwrap_err();
		assert!(matches!(err, GatewayError::AssetNotFound(_)));
	}

	#[tokio::test]
	async fn test_get_balance_formats_exactly() {
		let (provider, _) = provider(MockEvmRpc {
			balance: U256::from(1_000_000_000_000_000_000u64),
			..Default::default()
		});

		let balance = provider.get_balance(TOKEN, WALLET).await.unwrap();
		assert_eq!(balance.balance, "1000000000000000000");
		assert_eq!(balance.formatted_balance, "1");
		assert_eq!(balance.asset_id, format!("ethereum-{}", TOKEN));
		assert_eq!(balance.wallet_address, WALLET);
	}

	#[tokio::test]
	async fn test_get_balance_zero() {
		let (provider, _) = provider(MockEvmRpc::default());

		let balance = provider.get_balance(TOKEN, WALLET).await.unwrap();
		assert_eq!(balance.balance, "0");
		assert_eq!(balance.formatted_balance, "0");
	}

	#[tokio::test]
	async fn test_get_transaction_status_follows_receipt() {
		let tx = EvmTransaction {
			from: Address::from_str(WALLET).unwrap(),
			to: None,
			value: U256::from(5u64),
			block_number: Some(19_000_000),
		};
		let hash = format!("0x{}", "ab".repeat(32));

		let (confirmed, _) = provider(MockEvmRpc {
			transaction: Some(tx.clone()),
			receipt: Some(EvmReceipt {
				success: true,
				block_number: Some(19_000_000),
			}),
			..Default::default()
		});
		let record = confirmed.get_transaction(&hash).await.unwrap();
		assert_eq!(record.status, TransactionStatus::Confirmed);
		assert_eq!(record.amount, "5");
		assert_eq!(record.to, "");
		assert_eq!(record.block_number, Some(19_000_000));

		let (reverted, _) = provider(MockEvmRpc {
			transaction: Some(tx.clone()),
			receipt: Some(EvmReceipt {
				success: false,
				block_number: Some(19_000_000),
			}),
			..Default::default()
		});
		let record = reverted.get_transaction(&hash).await.unwrap();
		assert_eq!(record.status, TransactionStatus::Failed);

		let (unmined, _) = provider(MockEvmRpc {
			transaction: Some(tx),
			..Default::default()
		});
		let record = unmined.get_transaction(&hash).await.unwrap();
		assert_eq!(record.status, TransactionStatus::Failed);
	}

	#[tokio::test]
	async fn test_get_transaction_block_number_from_receipt() {
		let hash = format!("0x{}", "ef".repeat(32));
		let (provider, _) = provider(MockEvmRpc {
			transaction: Some(EvmTransaction {
				from: Address::from_str(WALLET).unwrap(),
				to: Some(Address::from_str(TOKEN).unwrap()),
				value: U256::ZERO,
				block_number: None,
			}),
			receipt: Some(EvmReceipt {
				success: true,
				block_number: Some(19_000_123),
			}),
			..Default::default()
		});

		let record = provider.get_transaction(&hash).await.unwrap();
		assert_eq!(record.block_number, Some(19_000_123));
	}

	#[tokio::test]
	async fn test_get_transaction_not_found() {
		let (provider, _) = provider(MockEvmRpc::default());
		let hash = format!("0x{}", "cd".repeat(32));

		let err = provider.get_transaction(&hash).await.unwrap_err();
		assert_eq!(err, GatewayError::TransactionNotFound);
	}

	#[tokio::test]
	async fn test_estimate_gas_converts_whole_units() {
		let (provider, rpc) = provider(MockEvmRpc::default());
		let request = GasEstimateRequest {
			from: WALLET.to_string(),
			to: TOKEN.to_string(),
			amount: "1.5".to_string(),
		};

		let gas = provider.estimate_gas(&request).await.unwrap();
		assert_eq!(gas, "21000");
		assert_eq!(
			*rpc.estimated_value.lock().unwrap(),
			Some(U256::from(1_500_000_000_000_000_000u64))
		);
	}

	#[tokio::test]
	async fn test_estimate_gas_wraps_rpc_rejection() {
		let (provider, _) = provider(MockEvmRpc {
			estimate_error: Some("insufficient funds for transfer".to_string()),
			..Default::default()
		});
		let request = GasEstimateRequest {
			from: WALLET.to_string(),
			to: TOKEN.to_string(),
			amount: "100".to_string(),
		};

		let err = provider.estimate_gas(&request).await.unwrap_err();
		assert_eq!(
			err.to_string(),
			"Failed to estimate gas: insufficient funds for transfer"
		);
	}

	#[tokio::test]
	async fn test_estimate_gas_rejects_bad_amount() {
		let (provider, rpc) = provider(MockEvmRpc::default());
		let request = GasEstimateRequest {
			from: WALLET.to_string(),
			to: TOKEN.to_string(),
			amount: "lots".to_string(),
		};

		let err = provider.estimate_gas(&request).await.unwrap_err();
		assert!(matches!(err, GatewayError::GasEstimationFailed(_)));
		assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
	}
}
