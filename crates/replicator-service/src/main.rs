use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use replicator_config::{load_config, ConfigLoader, ReplicatorConfig};
use replicator_service::{api, ReplicatorService};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portfolio-replicator")]
#[command(about = "Portfolio replication service", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Configuration file; standard locations are searched when omitted
	#[arg(short, long, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Log level; falls back to `service.log_level` from the configuration
	#[arg(long, env = "REPLICATOR_LOG_LEVEL")]
	log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the HTTP service
	Start,
	/// Validate the configuration
	Validate,
	/// Print the Safe setup batch for a Safe address
	Batch {
		/// Safe address
		safe: String,
	},
	/// Print the encoded order parameters replicating a target address
	Encode {
		/// Target address
		target: String,
		/// Receiver of bought tokens, defaults to the target
		#[arg(long)]
		receiver: Option<String>,
	},
	/// Print the portfolio listing
	Portfolios,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = load(&cli)?;

	// Initialize tracing
	setup_tracing(log_level(&cli, &config))?;
	if let Some(path) = &cli.config {
		info!("Loaded configuration from: {:?}", path);
	}

	// Handle commands
	match cli.command {
		Some(Commands::Start) | None => start_service(config).await,
		Some(Commands::Validate) => validate_config(config),
		Some(Commands::Batch { safe }) => {
			let service = ReplicatorService::with_delivery(config, None)?;
			let batch = service.safe_batch(&safe)?;
			println!("{}", serde_json::to_string_pretty(&batch)?);
			Ok(())
		}
		Some(Commands::Encode { target, receiver }) => {
			let service = ReplicatorService::with_delivery(config, None)?;
			println!("{}", service.encode_order(&target, receiver.as_deref())?);
			Ok(())
		}
		Some(Commands::Portfolios) => {
			let service = ReplicatorService::with_delivery(config, None)?;
			let rows = service.portfolios().await?;
			println!("{}", serde_json::to_string_pretty(&rows)?);
			Ok(())
		}
	}
}

fn load(cli: &Cli) -> Result<ReplicatorConfig> {
	let config = match &cli.config {
		Some(path) => ConfigLoader::from_env_and_file(Some(path.as_path())),
		None => load_config(),
	};
	config.context("Failed to load configuration")
}

fn log_level<'a>(cli: &'a Cli, config: &'a ReplicatorConfig) -> &'a str {
	cli.log_level
		.as_deref()
		.unwrap_or(&config.service.log_level)
}

async fn start_service(config: ReplicatorConfig) -> Result<()> {
	info!("Starting portfolio replicator");
	info!("Service name: {}", config.service.name);
	info!("HTTP port: {}", config.service.http_port);
	info!("Default network: {}", config.default_network);

	let service = Arc::new(
		ReplicatorService::new(config).context("Failed to build replicator service")?,
	);

	api::start_http_server(service, setup_shutdown_signal()).await?;

	info!("Portfolio replicator stopped");
	Ok(())
}

fn validate_config(config: ReplicatorConfig) -> Result<()> {
	let network = config.network()?;

	info!("Configuration is valid");
	info!("Service name: {}", config.service.name);
	info!("Default network: {} ({})", network.name, config.default_network);
	info!("Sell tokens: {:?}", config.order.sell_tokens);
	info!(
		"Wallet RPC: {}",
		config.delivery.rpc_url.as_deref().unwrap_or("<not configured>")
	);

	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	// Keep stdout for command output.
	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received, stopping services...");
}
