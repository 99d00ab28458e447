//! Construction of chain providers from network configuration.

use crate::{
	implementations::{
		evm::{AlloyRpcClient, EvmProvider},
		solana::{HttpSolanaClient, SolanaProvider},
	},
	utils::DEFAULT_RPC_TIMEOUT,
};
use std::{sync::Arc, time::Duration};
use tracing::debug;
use uasset_types::{
	errors::{GatewayError, Result},
	BlockchainFamily, ChainProvider, NetworkConfig,
};

/// Builds the provider serving one network.
///
/// The registry calls this on every add so tests can substitute providers
/// that never touch the network.
pub trait ProviderFactory: Send + Sync {
	fn create(&self, network: &NetworkConfig) -> Result<Arc<dyn ChainProvider>>;
}

/// Creates RPC-backed providers: a Solana provider for the reserved `solana`
/// id and an EVM provider for every other id.
#[derive(Debug, Clone)]
pub struct RpcProviderFactory {
	timeout: Duration,
}

impl RpcProviderFactory {
	pub fn new(timeout: Duration) -> Self {
		Self { timeout }
	}
}

impl Default for RpcProviderFactory {
	fn default() -> Self {
		Self::new(DEFAULT_RPC_TIMEOUT)
	}
}

impl ProviderFactory for RpcProviderFactory {
	fn create(&self, network: &NetworkConfig) -> Result<Arc<dyn ChainProvider>> {
		debug!(
			"Creating {} provider for {} at {}",
			network.family(),
			network.id,
			network.rpc_url
		);

		let provider: Arc<dyn ChainProvider> = match network.family() {
			BlockchainFamily::Solana => {
				let client = HttpSolanaClient::new(&network.rpc_url, self.timeout)
					.map_err(|e| GatewayError::Config(e.to_string()))?;
				Arc::new(SolanaProvider::new(network.clone(), Arc::new(client)))
			}
			BlockchainFamily::Evm => {
				let client = AlloyRpcClient::new(&network.rpc_url, self.timeout)
					.map_err(|e| GatewayError::Config(e.to_string()))?;
				Arc::new(EvmProvider::new(network.clone(), Arc::new(client)))
			}
		};

		Ok(provider)
	}
}
