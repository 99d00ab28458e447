//! Normalized entities returned by every chain provider.
//!
//! All of these are value snapshots built fresh for a single request. Nothing
//! here is cached or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network id reserved for the Solana adapter. Every other id is served by
/// the EVM adapter.
pub const SOLANA_NETWORK_ID: &str = "solana";

/// Blockchain family a network belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockchainFamily {
	Evm,
	Solana,
}

impl BlockchainFamily {
	/// Resolves the family from a network id. Only the reserved `solana` id maps
	/// to Solana.
	pub fn for_network_id(network_id: &str) -> Self {
		if network_id == SOLANA_NETWORK_ID {
			Self::Solana
		} else {
			Self::Evm
		}
	}
}

impl fmt::Display for BlockchainFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Evm => write!(f, "evm"),
			Self::Solana => write!(f, "solana"),
		}
	}
}

impl FromStr for BlockchainFamily {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"evm" => Ok(Self::Evm),
			"solana" => Ok(Self::Solana),
			other => Err(format!("Unknown blockchain type: {}", other)),
		}
	}
}

/// Static description of a network the gateway can route to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
	/// Unique registry key, also the first path segment of the API.
	pub id: String,
	/// Display name.
	pub name: String,
	#[serde(alias = "rpc_url")]
	pub rpc_url: String,
	#[serde(default, alias = "chain_id", skip_serializing_if = "Option::is_none")]
	pub chain_id: Option<u64>,
	#[serde(
		default,
		alias = "block_explorer",
		skip_serializing_if = "Option::is_none"
	)]
	pub block_explorer: Option<String>,
}

impl NetworkConfig {
	pub fn family(&self) -> BlockchainFamily {
		BlockchainFamily::for_network_id(&self.id)
	}
}

/// Builds the composite asset id `{networkId}-{contractAddress}`.
pub fn asset_id(network_id: &str, contract_address: &str) -> String {
	format!("{}-{}", network_id, contract_address)
}

/// Synthetic wrapped-asset view of a token contract or mint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalAsset {
	pub id: String,
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub blockchain_type: BlockchainFamily,
	pub network_id: String,
	pub contract_address: String,
	/// Underlying asset reference, `None` when the chain exposes no such field.
	pub underlying_asset: Option<String>,
	/// Exchange rate as a decimal string, `None` when unknown.
	pub exchange_rate: Option<String>,
	pub total_supply: String,
	/// Always equal to `total_supply`; there is no separate circulating source.
	pub circulating_supply: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	pub last_updated: DateTime<Utc>,
}

/// Token holdings of one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
	pub asset_id: String,
	pub wallet_address: String,
	/// Raw integer amount in base units.
	pub balance: String,
	/// Decimal string adjusted by the asset's decimals.
	pub formatted_balance: String,
	pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
	Pending,
	Confirmed,
	Failed,
}

/// Normalized view of a transaction or signature lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
	pub hash: String,
	pub from: String,
	/// Empty when the chain data carries no recipient.
	pub to: String,
	/// The moved asset is not resolved, so this is usually empty.
	pub asset_id: String,
	/// Raw units. Always `"0"` on Solana.
	pub amount: String,
	pub blockchain_type: BlockchainFamily,
	pub network_id: String,
	pub status: TransactionStatus,
	/// Block number on EVM chains, slot on Solana.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,
	pub timestamp: DateTime<Utc>,
}

/// Parameters of a native-currency transfer to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimateRequest {
	pub from: String,
	pub to: String,
	/// Whole-unit decimal string, e.g. `"0.5"`.
	pub amount: String,
}
