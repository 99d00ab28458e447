//! Registry mapping network ids to their configuration and provider.
//!
//! The `ProviderManager` holds an immutable snapshot behind an [`ArcSwap`].
//! Readers load the current snapshot without locking; writers build a new
//! snapshot and swap it in. A resolve therefore always returns a provider and
//! configuration taken from the same snapshot, even if the network is removed
//! while the caller is still using them.

use crate::factory::ProviderFactory;
use arc_swap::ArcSwap;
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{debug, info};
use uasset_types::{
	errors::{GatewayError, Result},
	BlockchainFamily, ChainProvider, NetworkConfig,
};

/// A configured network together with the provider serving it.
#[derive(Clone)]
pub struct NetworkEntry {
	pub config: Arc<NetworkConfig>,
	pub provider: Arc<dyn ChainProvider>,
}

impl fmt::Debug for NetworkEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NetworkEntry")
			.field("config", &self.config)
			.field("family", &self.provider.family())
			.finish()
	}
}

#[derive(Default, Clone)]
struct Snapshot {
	entries: HashMap<String, NetworkEntry>,
	/// Ids in insertion order, for stable listings.
	order: Vec<String>,
}

/// Registry of networks and their providers.
///
/// Lookups are lock-free. Mutations are serialized by the swap itself, so
/// concurrent writers never lose each other's updates.
pub struct ProviderManager {
	snapshot: ArcSwap<Snapshot>,
	factory: Arc<dyn ProviderFactory>,
}

impl ProviderManager {
	/// Creates an empty registry.
	pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
		Self {
			snapshot: ArcSwap::from_pointee(Snapshot::default()),
			factory,
		}
	}

	/// Creates a registry populated with `networks`.
	///
	/// # Errors
	///
	/// Returns an error if a provider cannot be created for any network.
	pub fn from_networks(
		factory: Arc<dyn ProviderFactory>,
		networks: impl IntoIterator<Item = NetworkConfig>,
	) -> Result<Self> {
		let manager = Self::new(factory);
		for network in networks {
			manager.add_network(network)?;
		}
		Ok(manager)
	}

	/// Adds a network, replacing both configuration and provider when the id
	/// is already registered.
	pub fn add_network(&self, config: NetworkConfig) -> Result<()> {
		if config.id.is_empty() {
			return Err(GatewayError::Validation(
				"Network id must not be empty".to_string(),
			));
		}

		// Built outside the swap so a failing factory leaves the registry untouched
		let provider = self.factory.create(&config)?;
		let id = config.id.clone();
		let entry = NetworkEntry {
			config: Arc::new(config),
			provider,
		};

		self.snapshot.rcu(|current| {
			let mut next = Snapshot::clone(current);
			if next.entries.insert(id.clone(), entry.clone()).is_none() {
				next.order.push(id.clone());
			}
			next
		});

		info!("Registered network {} ({})", id, entry.provider.family());
		Ok(())
	}

	/// Removes a network. Removing an unknown id is not an error.
	pub fn remove_network(&self, id: &str) {
		let mut removed = false;
		self.snapshot.rcu(|current| {
			let mut next = Snapshot::clone(current);
			removed = next.entries.remove(id).is_some();
			next.order.retain(|existing| existing != id);
			next
		});

		if removed {
			info!("Removed network {}", id);
		} else {
			debug!("Network {} was not registered", id);
		}
	}

	/// Returns the provider and configuration for `network_id`.
	///
	/// # Errors
	///
	/// Returns `GatewayError::NetworkNotFound` if the id is not registered.
	pub fn resolve(&self, network_id: &str) -> Result<NetworkEntry> {
		self.snapshot
			.load()
			.entries
			.get(network_id)
			.cloned()
			.ok_or_else(|| GatewayError::NetworkNotFound(network_id.to_string()))
	}

	/// Returns the provider for `network_id`.
	pub fn get_provider(&self, network_id: &str) -> Result<Arc<dyn ChainProvider>> {
		self.resolve(network_id).map(|entry| entry.provider)
	}

	/// Returns the configuration for `network_id`, if registered.
	pub fn get_network(&self, network_id: &str) -> Option<NetworkConfig> {
		self.snapshot
			.load()
			.entries
			.get(network_id)
			.map(|entry| NetworkConfig::clone(&entry.config))
	}

	/// Returns every configured network in registration order.
	pub fn list_networks(&self) -> Vec<NetworkConfig> {
		let snapshot = self.snapshot.load();
		snapshot
			.order
			.iter()
			.filter_map(|id| snapshot.entries.get(id))
			.map(|entry| NetworkConfig::clone(&entry.config))
			.collect()
	}

	/// Returns the configured networks of one family in registration order.
	pub fn list_networks_by_family(&self, family: BlockchainFamily) -> Vec<NetworkConfig> {
		self.list_networks()
			.into_iter()
			.filter(|network| network.family() == family)
			.collect()
	}

	/// Number of registered networks.
	pub fn len(&self) -> usize {
		self.snapshot.load().order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for ProviderManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderManager")
			.field("networks", &self.snapshot.load().order)
			.finish()
	}
}
