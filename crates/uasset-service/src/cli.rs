//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "uasset-gateway")]
#[command(about = "HTTP gateway for universal assets on EVM chains and Solana", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file (TOML, JSON or YAML)
	#[arg(short, long, env = "CONFIG_FILE")]
	pub config: Option<PathBuf>,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long, env = "LOG_LEVEL")]
	pub log_level: Option<String>,

	/// Subcommand to execute
	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Start the HTTP gateway (default)
	#[command(about = "Start the HTTP gateway")]
	Serve,

	/// Validate configuration file
	#[command(about = "Validate a gateway configuration file")]
	Validate {
		/// Path to configuration file to validate
		#[arg(help = "Configuration file to validate")]
		config: PathBuf,
	},

	/// Generate example configuration
	#[command(about = "Generate a configuration file with the built-in defaults")]
	GenerateConfig {
		/// Output file path
		#[arg(short, long, default_value = "config.toml")]
		#[arg(help = "Output path for the generated configuration")]
		output: PathBuf,
	},

	/// Show the effective network table
	#[command(about = "List configured networks after environment overrides")]
	Networks,
}
