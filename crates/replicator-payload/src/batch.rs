//! Safe setup batch construction.
//!
//! A freshly created Safe needs four calls before the order manager can
//! settle orders on its behalf. The fallback handler must be installed first
//! since the domain verifier and the order registration both go through it.

use crate::PayloadError;
use alloy::primitives::U256;
use replicator_config::{ConditionalOrderSettings, NetworkContracts, ReplicatorConfig};
use replicator_types::{
	parse_address, Address, BatchMeta, ChainId, ContractCallDescriptor, ContractMethod,
	MethodInput, TimestampMillis, TransactionBatchPayload, B256, BATCH_FORMAT_VERSION,
};
use tracing::debug;

/// Builds the Safe setup batch for one network.
///
/// All constants are captured at construction, so `build` is a pure function
/// of the Safe address.
#[derive(Debug, Clone)]
pub struct BatchBuilder {
	chain_id: ChainId,
	contracts: NetworkContracts,
	domain_separator: B256,
	conditional_order: ConditionalOrderSettings,
	meta: BatchMeta,
	created_at: TimestampMillis,
}

impl BatchBuilder {
	/// Captures the constants of the configured default network.
	pub fn from_config(config: &ReplicatorConfig) -> Result<Self, PayloadError> {
		let network = config.network()?;

		Ok(Self {
			chain_id: config.default_network,
			contracts: network.contracts.clone(),
			domain_separator: network.domain_separator,
			conditional_order: config.conditional_order.clone(),
			meta: BatchMeta {
				name: config.batch.name.clone(),
				description: config.batch.description.clone(),
				tx_builder_version: config.batch.tx_builder_version.clone(),
				created_from_safe_address: config.batch.created_from_safe_address.clone(),
				created_from_owner_address: config.batch.created_from_owner_address.clone(),
				checksum: config.batch.checksum.clone(),
			},
			created_at: config.batch.created_at,
		})
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	/// Parses `safe` and builds its setup batch.
	pub fn build_from_str(&self, safe: &str) -> Result<TransactionBatchPayload, PayloadError> {
		let safe = parse_address(safe)?;
		Ok(self.build(safe))
	}

	/// Builds the setup batch for `safe`.
	pub fn build(&self, safe: Address) -> TransactionBatchPayload {
		debug!(safe = %safe, chain_id = %self.chain_id, "building safe setup batch");

		TransactionBatchPayload {
			version: BATCH_FORMAT_VERSION.to_string(),
			chain_id: self.chain_id,
			created_at: self.created_at,
			meta: self.meta.clone(),
			transactions: vec![
				self.set_fallback_handler(safe),
				self.set_domain_verifier(safe),
				self.approve_sell_token(),
				self.create_conditional_order(),
			],
		}
	}

	fn set_fallback_handler(&self, safe: Address) -> ContractCallDescriptor {
		ContractCallDescriptor::new(
			safe,
			ContractMethod::new("setFallbackHandler", vec![MethodInput::new("handler", "address")]),
		)
		.with_input("handler", checksummed(self.contracts.fallback_handler))
	}

	fn set_domain_verifier(&self, safe: Address) -> ContractCallDescriptor {
		ContractCallDescriptor::new(
			safe,
			ContractMethod::new(
				"setDomainVerifier",
				vec![
					MethodInput::new("domainSeparator", "bytes32"),
					MethodInput::new("newVerifier", "address")
						.with_internal_type("contract ISafeSignatureVerifier"),
				],
			),
		)
		.with_input("domainSeparator", self.domain_separator.to_string())
		.with_input("newVerifier", checksummed(self.contracts.domain_verifier))
	}

	/// Unlimited approval of the sell token to the vault relayer.
	fn approve_sell_token(&self) -> ContractCallDescriptor {
		ContractCallDescriptor::new(
			self.contracts.sell_token,
			ContractMethod::new(
				"approve",
				vec![
					MethodInput::new("spender", "address"),
					MethodInput::new("value", "uint256"),
				],
			),
		)
		.with_input("spender", checksummed(self.contracts.vault_relayer))
		.with_input("value", U256::MAX.to_string())
	}

	fn create_conditional_order(&self) -> ContractCallDescriptor {
		let order = &self.conditional_order;
		let params = format!(
			"[\"{}\",\"{}\",\"{}\"]",
			checksummed(order.handler),
			order.salt,
			order.static_input
		);

		ContractCallDescriptor::new(
			self.contracts.composable_cow,
			ContractMethod::new(
				"create",
				vec![
					MethodInput::new("params", "tuple")
						.with_internal_type("struct IConditionalOrder.ConditionalOrderParams")
						.with_components(vec![
							MethodInput::new("handler", "address")
								.with_internal_type("contract IConditionalOrder"),
							MethodInput::new("salt", "bytes32"),
							MethodInput::new("staticInput", "bytes"),
						]),
					MethodInput::new("dispatch", "bool"),
				],
			),
		)
		.with_input("params", params)
		.with_input("dispatch", order.dispatch.to_string())
	}
}

fn checksummed(address: Address) -> String {
	address.to_checksum(None)
}
