//! Configuration types for the gateway.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uasset_types::NetworkConfig;

/// Complete gateway configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
	/// HTTP listener settings
	pub server: ServerSettings,
	/// Chain RPC settings shared by all networks
	pub rpc: RpcSettings,
	/// Log output settings
	pub logging: LoggingSettings,
	/// Networks served at startup
	pub networks: Vec<NetworkConfig>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings::default(),
			rpc: RpcSettings::default(),
			logging: LoggingSettings::default(),
			networks: default_networks(),
		}
	}
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
	/// Maximum request body size in bytes
	pub max_request_size: usize,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
			max_request_size: 10 * 1024 * 1024,
		}
	}
}

impl ServerSettings {
	/// `host:port` for the listener.
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

/// Chain RPC settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcSettings {
	/// Upper bound on a single RPC round trip
	pub timeout_secs: u64,
}

impl Default for RpcSettings {
	fn default() -> Self {
		Self { timeout_secs: 30 }
	}
}

impl RpcSettings {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	/// Human-readable lines
	#[default]
	Pretty,
	/// One JSON object per event
	Json,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Default filter directive, overridden by `RUST_LOG`
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
		}
	}
}

/// Networks served when the configuration does not list any.
pub fn default_networks() -> Vec<NetworkConfig> {
	vec![
		NetworkConfig {
			id: "ethereum".to_string(),
			name: "Ethereum Mainnet".to_string(),
			rpc_url: "https://eth.llamarpc.com".to_string(),
			chain_id: Some(1),
			block_explorer: Some("https://etherscan.io".to_string()),
		},
		NetworkConfig {
			id: "base".to_string(),
			name: "Base".to_string(),
			rpc_url: "https://mainnet.base.org".to_string(),
			chain_id: Some(8453),
			block_explorer: Some("https://basescan.org".to_string()),
		},
		NetworkConfig {
			id: "polygon".to_string(),
			name: "Polygon".to_string(),
			rpc_url: "https://polygon-rpc.com".to_string(),
			chain_id: Some(137),
			block_explorer: Some("https://polygonscan.com".to_string()),
		},
		NetworkConfig {
			id: "solana".to_string(),
			name: "Solana".to_string(),
			rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
			chain_id: None,
			block_explorer: Some("https://solscan.io".to_string()),
		},
	]
}
