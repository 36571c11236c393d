//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/replicator.toml

use std::env;
use std::process;

use replicator_config::ConfigLoader;

fn main() {
	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	match ConfigLoader::from_file(config_path) {
		Ok(config) => {
			println!("✅ Configuration is valid!");
			println!("Service name: {}", config.service.name);
			println!("Networks configured: {}", config.networks.len());
			println!("Default network: {}", config.default_network);
			println!("Sell tokens: {:?}", config.order.sell_tokens);
			println!(
				"Wallet RPC: {}",
				config.delivery.rpc_url.as_deref().unwrap_or("<not configured>")
			);
		}
		Err(e) => {
			eprintln!("❌ Configuration validation failed:");
			eprintln!("{:#}", e);
			process::exit(1);
		}
	}
}
