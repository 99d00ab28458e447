//! Configuration for the uAsset gateway.
//!
//! Settings come from built-in defaults, an optional TOML/JSON/YAML file and
//! environment overrides, in that order, and are validated once at startup.

pub mod loader;
pub mod types;

pub use loader::{rpc_url_env_var, validate_config, ConfigLoader};
pub use types::{
	default_networks, LogFormat, LoggingSettings, RpcSettings, ServerSettings, Settings,
};

/// Renders the default settings as a TOML document.
pub fn default_config_toml() -> anyhow::Result<String> {
	toml::to_string_pretty(&Settings::default())
		.map_err(|e| anyhow::anyhow!("Failed to render default config: {}", e))
}
