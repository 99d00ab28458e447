//! EVM JSON-RPC client seam and its alloy-backed implementation.

use crate::utils::{with_timeout, RpcError};
use alloy::{
	network::{Ethereum, ReceiptResponse, TransactionResponse},
	primitives::{Address, Bytes, B256, U256},
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Transaction fields the gateway reads from `eth_getTransactionByHash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTransaction {
	pub from: Address,
	/// `None` for contract creation.
	pub to: Option<Address>,
	pub value: U256,
	pub block_number: Option<u64>,
}

/// Receipt fields the gateway reads from `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmReceipt {
	pub success: bool,
	pub block_number: Option<u64>,
}

/// The EVM JSON-RPC capabilities the EVM provider needs.
#[async_trait]
pub trait EvmRpc: Send + Sync {
	/// `eth_call` against the latest block.
	async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RpcError>;

	async fn get_transaction(&self, hash: B256) -> Result<Option<EvmTransaction>, RpcError>;

	async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<EvmReceipt>, RpcError>;

	/// `eth_estimateGas` for a plain value transfer.
	async fn estimate_gas(&self, from: Address, to: Address, value: U256)
		-> Result<u64, RpcError>;
}

/// [`EvmRpc`] over HTTP using an alloy provider.
pub struct AlloyRpcClient {
	provider: DynProvider<Ethereum>,
	rpc_url: String,
	timeout: Duration,
}

impl std::fmt::Debug for AlloyRpcClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AlloyRpcClient")
			.field("rpc_url", &self.rpc_url)
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl AlloyRpcClient {
	/// Creates a client for the given endpoint. No request is made until the
	/// first call.
	pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, RpcError> {
		let url: alloy::transports::http::reqwest::Url = rpc_url
			.parse()
			.map_err(|e| RpcError::Transport(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self {
			provider,
			rpc_url: rpc_url.to_string(),
			timeout,
		})
	}

	pub fn rpc_url(&self) -> &str {
		&self.rpc_url
	}
}

#[async_trait]
impl EvmRpc for AlloyRpcClient {
	async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RpcError> {
		debug!("eth_call to {} at {}", to, self.rpc_url);

		let request = TransactionRequest::default().to(to).input(input.into());
		with_timeout(self.timeout, "eth_call", async {
			self.provider
				.call(request)
				.await
				.map_err(|e| RpcError::Transport(e.to_string()))
		})
		.await
	}

	async fn get_transaction(&self, hash: B256) -> Result<Option<EvmTransaction>, RpcError> {
		debug!("eth_getTransactionByHash {} at {}", hash, self.rpc_url);

		let tx = with_timeout(self.timeout, "eth_getTransactionByHash", async {
			self.provider
				.get_transaction_by_hash(hash)
				.await
				.map_err(|e| RpcError::Transport(e.to_string()))
		})
		.await?;

		Ok(tx.map(|tx| EvmTransaction {
			from: TransactionResponse::from(&tx),
			to: alloy::consensus::Transaction::to(&tx),
			value: alloy::consensus::Transaction::value(&tx),
			block_number: TransactionResponse::block_number(&tx),
		}))
	}

	async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<EvmReceipt>, RpcError> {
		debug!("eth_getTransactionReceipt {} at {}", hash, self.rpc_url);

		let receipt = with_timeout(self.timeout, "eth_getTransactionReceipt", async {
			self.provider
				.get_transaction_receipt(hash)
				.await
				.map_err(|e| RpcError::Transport(e.to_string()))
		})
		.await?;

		Ok(receipt.map(|r| EvmReceipt {
			success: ReceiptResponse::status(&r),
			block_number: ReceiptResponse::block_number(&r),
		}))
	}

	async fn estimate_gas(
		&self,
		from: Address,
		to: Address,
		value: U256,
	) -> Result<u64, RpcError> {
		debug!(
			"eth_estimateGas {} -> {} value {} at {}",
			from, to, value, self.rpc_url
		);

		let request = TransactionRequest::default().from(from).to(to).value(value);
		with_timeout(self.timeout, "eth_estimateGas", async {
			self.provider
				.estimate_gas(request)
				.await
				.map_err(|e| RpcError::Transport(e.to_string()))
		})
		.await
	}
}
