//! Configuration loading from files and environment.

use crate::types::*;
use anyhow::{Context, Result};
use replicator_types::ChainId;
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ReplicatorConfig> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<ReplicatorConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<ReplicatorConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<ReplicatorConfig> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}

	/// Load from environment variables with optional file override
	pub fn from_env_and_file(file_path: Option<&Path>) -> Result<ReplicatorConfig> {
		let mut config = if let Some(path) = file_path {
			Self::from_file(path)?
		} else {
			ReplicatorConfig::default()
		};

		Self::apply_env_overrides(&mut config)?;

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Apply environment variable overrides
	fn apply_env_overrides(config: &mut ReplicatorConfig) -> Result<()> {
		if let Ok(url) = std::env::var("REPLICATOR_RPC_URL") {
			debug!("Overriding wallet RPC URL from environment");
			config.delivery.rpc_url = Some(url);
		}

		if let Ok(port) = std::env::var("REPLICATOR_HTTP_PORT") {
			debug!("Overriding HTTP port from environment");
			config.service.http_port = port
				.parse()
				.with_context(|| format!("Invalid REPLICATOR_HTTP_PORT: {}", port))?;
		}

		if let Ok(network) = std::env::var("REPLICATOR_NETWORK") {
			debug!("Overriding default network from environment");
			config.default_network = network
				.parse::<ChainId>()
				.with_context(|| format!("Invalid REPLICATOR_NETWORK: {}", network))?;
		}

		Ok(())
	}

	/// Validate configuration
	pub fn validate_config(config: &ReplicatorConfig) -> Result<()> {
		if config.service.http_port == 0 {
			anyhow::bail!("HTTP port must be non-zero");
		}

		let network = config.networks.get(&config.default_network).ok_or_else(|| {
			anyhow::anyhow!(
				"Default network {} is not configured",
				config.default_network
			)
		})?;

		if config.order.sell_tokens.is_empty() {
			anyhow::bail!("Order must name at least one sell token");
		}

		if config.order.sell_tokens.len() != config.order.deltas.len() {
			anyhow::bail!(
				"Order has {} sell tokens but {} deltas",
				config.order.sell_tokens.len(),
				config.order.deltas.len()
			);
		}

		for symbol in &config.order.sell_tokens {
			if !network.tokens.contains_key(symbol) {
				anyhow::bail!(
					"Sell token '{}' is not in the {} token table",
					symbol,
					network.name
				);
			}
		}

		if let Some(url) = &config.delivery.rpc_url {
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				anyhow::bail!("RPC URL must start with http:// or https://");
			}
		}

		Ok(())
	}
}

/// Load configuration from standard locations
pub fn load_config() -> Result<ReplicatorConfig> {
	// Check for config file in order:
	// 1. Environment variable REPLICATOR_CONFIG
	// 2. ./config.toml
	// 3. ./config/replicator.toml
	// 4. Default config with env overrides

	if let Ok(path) = std::env::var("REPLICATOR_CONFIG") {
		return ConfigLoader::from_env_and_file(Some(Path::new(&path)));
	}

	let paths = ["./config.toml", "./config/replicator.toml"];

	for path in &paths {
		if Path::new(path).exists() {
			return ConfigLoader::from_env_and_file(Some(Path::new(path)));
		}
	}

	ConfigLoader::from_env_and_file(None)
}
