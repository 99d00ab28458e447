//! Query service translating provider results into response envelopes.

use std::sync::Arc;
use tracing::{instrument, warn};
use uasset_chains::ProviderManager;
use uasset_types::{
	AssetBalance, BlockchainFamily, GasEstimateRequest, NetworkConfig, ResponseEnvelope,
	TransactionRecord, UniversalAsset,
};

/// Resolves the provider for a network, runs one operation and wraps the
/// outcome in a [`ResponseEnvelope`]. Provider failures never escape as
/// errors; they become `success: false` envelopes carrying the message.
#[derive(Clone)]
pub struct QueryService {
	providers: Arc<ProviderManager>,
}

impl QueryService {
	pub fn new(providers: Arc<ProviderManager>) -> Self {
		Self { providers }
	}

	pub fn providers(&self) -> &Arc<ProviderManager> {
		&self.providers
	}

	/// Every configured network, optionally restricted to one family.
	pub fn list_networks(
		&self,
		family: Option<BlockchainFamily>,
	) -> ResponseEnvelope<Vec<NetworkConfig>> {
		let networks = match family {
			Some(family) => self.providers.list_networks_by_family(family),
			None => self.providers.list_networks(),
		};
		ResponseEnvelope::ok(networks)
	}

	#[instrument(skip(self))]
	pub async fn get_asset_info(
		&self,
		network_id: &str,
		contract_address: &str,
	) -> ResponseEnvelope<UniversalAsset> {
		let result = match self.providers.get_provider(network_id) {
			Ok(provider) => provider.get_asset_info(contract_address).await,
			Err(e) => Err(e),
		};
		envelope("get_asset_info", result)
	}

	#[instrument(skip(self))]
	pub async fn get_balance(
		&self,
		network_id: &str,
		contract_address: &str,
		wallet_address: &str,
	) -> ResponseEnvelope<AssetBalance> {
		let result = match self.providers.get_provider(network_id) {
			Ok(provider) => provider.get_balance(contract_address, wallet_address).await,
			Err(e) => Err(e),
		};
		envelope("get_balance", result)
	}

	#[instrument(skip(self))]
	pub async fn get_transaction(
		&self,
		network_id: &str,
		hash: &str,
	) -> ResponseEnvelope<TransactionRecord> {
		let result = match self.providers.get_provider(network_id) {
			Ok(provider) => provider.get_transaction(hash).await,
			Err(e) => Err(e),
		};
		envelope("get_transaction", result)
	}

	#[instrument(skip(self))]
	pub async fn estimate_gas(
		&self,
		network_id: &str,
		request: &GasEstimateRequest,
	) -> ResponseEnvelope<String> {
		let result = match self.providers.get_provider(network_id) {
			Ok(provider) => provider.estimate_gas(request).await,
			Err(e) => Err(e),
		};
		envelope("estimate_gas", result)
	}
}

fn envelope<T>(operation: &str, result: uasset_types::Result<T>) -> ResponseEnvelope<T> {
	if let Err(e) = &result {
		warn!("{} failed: {}", operation, e);
	}
	ResponseEnvelope::from_result(result)
}
