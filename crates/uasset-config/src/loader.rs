//! Configuration loading from files and environment.

use crate::types::Settings;
use anyhow::{Context, Result};
use std::{
	collections::HashSet,
	path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Configuration loader
///
/// Starts from the built-in defaults, optionally replaced by a file, then
/// applies environment overrides and validates the result.
#[derive(Debug, Default)]
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Loads settings using the process environment for overrides.
	pub fn load(&self) -> Result<Settings> {
		self.load_with_env(|key| std::env::var(key).ok())
	}

	/// Loads settings, reading overrides through `env`.
	pub fn load_with_env<F>(&self, env: F) -> Result<Settings>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = match &self.file_path {
			Some(path) => Self::from_file(path)?,
			None => {
				debug!("No configuration file given, using defaults");
				Settings::default()
			}
		};

		apply_env_overrides(&mut settings, env)?;
		validate_config(&settings)?;
		Ok(settings)
	}

	/// Parses a configuration file, picking the format from its extension.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents),
			Some("json") => Self::from_json(&contents),
			Some("yaml") | Some("yml") => Self::from_yaml(&contents),
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		}
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<Settings> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<Settings> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<Settings> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}
}

/// Environment variable overriding the RPC URL of `network_id`.
pub fn rpc_url_env_var(network_id: &str) -> String {
	format!("{}_RPC_URL", network_id.to_uppercase().replace('-', "_"))
}

/// Apply environment variable overrides
fn apply_env_overrides<F>(settings: &mut Settings, env: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	for network in &mut settings.networks {
		let key = rpc_url_env_var(&network.id);
		if let Some(url) = env(&key) {
			debug!("Overriding RPC URL for {} from {}", network.id, key);
			network.rpc_url = url;
		}
	}

	if let Some(host) = env("HOST") {
		settings.server.host = host;
	}

	if let Some(port) = env("PORT") {
		settings.server.port = port
			.parse()
			.with_context(|| format!("Invalid PORT: {}", port))?;
	}

	if let Some(timeout) = env("RPC_TIMEOUT_SECS") {
		settings.rpc.timeout_secs = timeout
			.parse()
			.with_context(|| format!("Invalid RPC_TIMEOUT_SECS: {}", timeout))?;
	}

	Ok(())
}

/// Validate configuration
pub fn validate_config(settings: &Settings) -> Result<()> {
	if settings.networks.is_empty() {
		anyhow::bail!("At least one network must be configured");
	}

	let mut seen = HashSet::new();
	for network in &settings.networks {
		if network.id.trim().is_empty() {
			anyhow::bail!("Network id must not be empty");
		}
		if !seen.insert(network.id.as_str()) {
			anyhow::bail!("Duplicate network id '{}'", network.id);
		}
		if !(network.rpc_url.starts_with("http://") || network.rpc_url.starts_with("https://")) {
			anyhow::bail!(
				"Network '{}' has an invalid RPC URL '{}': expected http(s)",
				network.id,
				network.rpc_url
			);
		}
	}

	if settings.server.port == 0 {
		anyhow::bail!("Server port must be non-zero");
	}

	if settings.rpc.timeout_secs == 0 {
		anyhow::bail!("RPC timeout must be non-zero");
	}

	Ok(())
}
