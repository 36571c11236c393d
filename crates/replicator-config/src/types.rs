//! Configuration types for the replicator.

use crate::serde_helpers::{deserialize_chain_id_map, serialize_chain_id_map};
use alloy::primitives::{address, b256, bytes};
use replicator_types::{Address, Bytes, ChainId, ReplicatorError, B256};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Complete replicator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplicatorConfig {
	/// Service identity and HTTP settings
	pub service: ServiceSettings,
	/// Network whose constants are used to build payloads
	pub default_network: ChainId,
	/// Network-specific constants keyed by chain id
	#[serde(
		deserialize_with = "deserialize_chain_id_map",
		serialize_with = "serialize_chain_id_map"
	)]
	pub networks: HashMap<ChainId, NetworkConfig>,
	/// Metadata written into transaction batches
	pub batch: BatchSettings,
	/// Conditional order registered by the batch
	pub conditional_order: ConditionalOrderSettings,
	/// Rebalancing order defaults
	pub order: OrderSettings,
	/// Wallet RPC used to submit orders
	#[serde(default)]
	pub delivery: DeliverySettings,
}

impl ReplicatorConfig {
	/// Constants of the configured default network.
	pub fn network(&self) -> Result<&NetworkConfig, ReplicatorError> {
		self.networks
			.get(&self.default_network)
			.ok_or(ReplicatorError::UnknownNetwork(self.default_network))
	}
}

/// Service identity and HTTP settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
	/// Service name for logging
	pub name: String,
	/// Interface the HTTP API binds to
	pub host: String,
	/// HTTP API port
	pub http_port: u16,
	/// Default log level when RUST_LOG is unset
	pub log_level: String,
}

/// Network-specific constants
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// Network name for logging
	pub name: String,
	/// Contract addresses on this network
	pub contracts: NetworkContracts,
	/// Order domain separator registered with the Safe
	pub domain_separator: B256,
	/// Token symbol to address table
	pub tokens: BTreeMap<String, Address>,
}

impl NetworkConfig {
	/// Resolves a token symbol through the static token table.
	pub fn token(&self, symbol: &str) -> Result<Address, ReplicatorError> {
		self.tokens
			.get(symbol)
			.copied()
			.ok_or_else(|| ReplicatorError::TokenNotFound(symbol.to_string()))
	}
}

/// Contract addresses for a network
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkContracts {
	/// Extensible fallback handler installed on the Safe
	pub fallback_handler: Address,
	/// Conditional order manager
	pub composable_cow: Address,
	/// Signature verifier registered for the domain separator
	pub domain_verifier: Address,
	/// Spender approved to move the sell token
	pub vault_relayer: Address,
	/// Token approved for selling
	pub sell_token: Address,
}

/// Metadata written into transaction batches
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchSettings {
	pub name: String,
	pub description: String,
	pub tx_builder_version: String,
	pub created_from_safe_address: String,
	pub created_from_owner_address: String,
	pub checksum: String,
	/// Fixed creation timestamp in Unix milliseconds
	pub created_at: u64,
}

/// Conditional order registered by the batch
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConditionalOrderSettings {
	/// Handler contract evaluating the order
	pub handler: Address,
	/// Salt distinguishing otherwise identical orders
	pub salt: B256,
	/// Opaque static input passed to the handler
	pub static_input: Bytes,
	/// Whether the manager emits the order creation event
	pub dispatch: bool,
}

/// Rebalancing order defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSettings {
	/// Token symbols resolved through the network token table
	pub sell_tokens: Vec<String>,
	/// Signed allocation deltas in basis points, paired with `sell_tokens`
	pub deltas: Vec<i64>,
	/// Application data hash attached to generated orders
	pub app_data: B256,
}

/// Wallet RPC settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeliverySettings {
	/// JSON-RPC endpoint of a wallet able to sign `eth_sendTransaction`
	pub rpc_url: Option<String>,
}

impl Default for ReplicatorConfig {
	fn default() -> Self {
		let mut networks = HashMap::new();
		networks.insert(ChainId::GOERLI, NetworkConfig::goerli());

		Self {
			service: ServiceSettings {
				name: "portfolio-replicator".to_string(),
				host: "127.0.0.1".to_string(),
				http_port: 3000,
				log_level: "info".to_string(),
			},
			default_network: ChainId::GOERLI,
			networks,
			batch: BatchSettings {
				name: "Test".to_string(),
				description: String::new(),
				tx_builder_version: "1.16.3".to_string(),
				created_from_safe_address: "0x5b7e5386d19C44be87d4a07858304874ae67DAbA"
					.to_string(),
				created_from_owner_address: String::new(),
				checksum: "0x9572b545a0648b4d41baa05cb9eadf4323fd5c2097b2d6f6d94e71e87a3aa6b3"
					.to_string(),
				created_at: 1700336687590,
			},
			conditional_order: ConditionalOrderSettings {
				handler: address!("2222222222222222222222222222222222222222"),
				salt: b256!("5555555555555555555555555555555555555555555555555555555555555555"),
				static_input: bytes!("baddad"),
				dispatch: true,
			},
			order: OrderSettings {
				sell_tokens: vec!["WETH".to_string(), "DAI".to_string()],
				deltas: vec![500, -500],
				app_data: b256!("b48d38f93eaa084033fc5970bf96e559c33c4cdc07d889ab00b4d63f9590739d"),
			},
			delivery: DeliverySettings::default(),
		}
	}
}

impl NetworkConfig {
	/// Goerli deployment used by the demo.
	pub fn goerli() -> Self {
		let mut tokens = BTreeMap::new();
		tokens.insert(
			"WETH".to_string(),
			address!("B4FBF271143F4FBf7B91A5ded31805e42b2208d6"),
		);
		tokens.insert(
			"DAI".to_string(),
			address!("dc31Ee1784292379Fbb2964b3B9C4124D8F89C60"),
		);
		tokens.insert(
			"COW".to_string(),
			address!("91056D4A53E1faa1A84306D4deAEc71085394bC8"),
		);
		tokens.insert(
			"USDC".to_string(),
			address!("D87Ba7A50B2E7E660f678A895E4B72E7CB4CCd9C"),
		);

		Self {
			name: "Goerli".to_string(),
			contracts: NetworkContracts {
				fallback_handler: address!("2f55e8b20D0B9FEFA187AA7d00B6Cbe563605bF5"),
				composable_cow: address!("fdaFc9d1902f4e0b84f65F49f244b32b31013b74"),
				domain_verifier: address!("fdaFc9d1902f4e0b84f65F49f244b32b31013b74"),
				vault_relayer: address!("C92E8bdf79f0507f65a392b0ab4667716BFE0110"),
				sell_token: address!("1111111111111111111111111111111111111111"),
			},
			domain_separator: b256!(
				"fb378b35457022ecc5709ae5dafad9393c1387ae6d8ce24913a0c969074c07fb"
			),
			tokens,
		}
	}
}
