use anyhow::{Context, Result};
use clap::Parser;
use std::{path::Path, sync::Arc};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uasset_chains::{ProviderManager, RpcProviderFactory};
use uasset_config::{default_config_toml, ConfigLoader, LogFormat, Settings};
use uasset_service::{
	api::{self, AppState},
	cli::{Args, Command},
	service::QueryService,
};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	match args.command.clone().unwrap_or(Command::Serve) {
		Command::Serve => {
			let settings = load_settings(&args)?;
			setup_tracing(
				args.log_level.as_deref().unwrap_or(&settings.logging.level),
				settings.logging.format,
			)?;
			start_service(settings).await
		}
		Command::Validate { config } => {
			setup_tracing(
				args.log_level.as_deref().unwrap_or("info"),
				LogFormat::Pretty,
			)?;
			validate_config(&config)
		}
		Command::GenerateConfig { output } => generate_config(&output),
		Command::Networks => list_networks(&load_settings(&args)?),
	}
}

fn load_settings(args: &Args) -> Result<Settings> {
	let loader = match &args.config {
		Some(path) => ConfigLoader::new().with_file(path),
		None => ConfigLoader::new(),
	};
	loader.load().context("Failed to load configuration")
}

async fn start_service(settings: Settings) -> Result<()> {
	info!("Starting uAsset gateway v{}", env!("CARGO_PKG_VERSION"));

	let factory = Arc::new(RpcProviderFactory::new(settings.rpc.timeout()));
	let providers = ProviderManager::from_networks(factory, settings.networks.clone())
		.context("Failed to initialize network providers")?;
	info!(
		"Serving {} networks with a {:?} RPC timeout",
		providers.len(),
		settings.rpc.timeout()
	);

	let state = AppState {
		service: QueryService::new(Arc::new(providers)),
	};
	let router = api::create_router(state, settings.server.max_request_size);

	api::start_http_server(router, &settings.server.bind_address(), setup_shutdown_signal())
		.await
		.context("HTTP server failed")?;

	info!("uAsset gateway stopped");
	Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
	info!("Validating configuration file: {:?}", path);

	let settings = ConfigLoader::new()
		.with_file(path)
		.load()
		.context("Configuration validation failed")?;

	println!("Configuration is valid");
	println!("Listen address: {}", settings.server.bind_address());
	println!("RPC timeout: {}s", settings.rpc.timeout_secs);
	list_networks(&settings)
}

fn generate_config(output: &Path) -> Result<()> {
	let rendered = default_config_toml()?;
	std::fs::write(output, rendered)
		.with_context(|| format!("Failed to write configuration to {:?}", output))?;

	println!("Wrote default configuration to {}", output.display());
	Ok(())
}

fn list_networks(settings: &Settings) -> Result<()> {
	println!("Networks configured: {}", settings.networks.len());
	for network in &settings.networks {
		println!(
			"  {:<12} {:<7} {:<20} {}",
			network.id,
			network.family(),
			network.name,
			network.rpc_url
		);
	}
	Ok(())
}

fn setup_tracing(log_level: &str, format: LogFormat) -> Result<()> {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
	let registry = tracing_subscriber::registry().with(env_filter);

	match format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.try_init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
	}
	.context("Failed to initialize tracing")?;

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			Err(e) => {
				error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received, stopping gateway...");
}
