//! Rebalancing order encoding.
//!
//! The replication order is registered with the conditional order manager
//! as opaque static input. Its layout is the `ReplicationOrderData` tuple,
//! encoded as a single ABI value (offset-prefixed, like `abi.encode(data)`).

use crate::contracts::{ConditionalOrderParams, IComposableCow, ReplicationOrderData};
use crate::PayloadError;
use alloy::sol_types::{SolCall, SolValue};
use replicator_config::ReplicatorConfig;
use replicator_types::{
	Address, Bytes, ChainId, OrderParameters, Transaction, B256, I256, U256,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Encodes replication orders for one network.
#[derive(Debug, Clone)]
pub struct OrderEncoder {
	chain_id: ChainId,
	composable_cow: Address,
	handler: Address,
	salt: B256,
	dispatch: bool,
	tokens: BTreeMap<String, Address>,
	sell_tokens: Vec<String>,
	deltas: Vec<i64>,
	app_data: B256,
}

impl OrderEncoder {
	/// Captures the constants of the configured default network.
	///
	/// Token symbols are resolved per order, so an unknown symbol surfaces
	/// as [`PayloadError::TokenNotFound`] from [`OrderEncoder::parameters`].
	pub fn from_config(config: &ReplicatorConfig) -> Result<Self, PayloadError> {
		let network = config.network()?;

		Ok(Self {
			chain_id: config.default_network,
			composable_cow: network.contracts.composable_cow,
			handler: config.conditional_order.handler,
			salt: config.conditional_order.salt,
			dispatch: config.conditional_order.dispatch,
			tokens: network.tokens.clone(),
			sell_tokens: config.order.sell_tokens.clone(),
			deltas: config.order.deltas.clone(),
			app_data: config.order.app_data,
		})
	}

	/// Builds the order parameters replicating `target`.
	///
	/// Bought tokens go to `receiver`, or back to `target` when no receiver
	/// is known yet.
	pub fn parameters(
		&self,
		target: Address,
		receiver: Option<Address>,
	) -> Result<OrderParameters, PayloadError> {
		if self.sell_tokens.len() != self.deltas.len() {
			return Err(PayloadError::LengthMismatch {
				tokens: self.sell_tokens.len(),
				deltas: self.deltas.len(),
			});
		}

		let sell_tokens = self
			.sell_tokens
			.iter()
			.map(|symbol| {
				self.tokens
					.get(symbol)
					.copied()
					.ok_or_else(|| PayloadError::TokenNotFound(symbol.clone()))
			})
			.collect::<Result<Vec<_>, _>>()?;

		let deltas = self
			.deltas
			.iter()
			.map(|delta| {
				I256::try_from(*delta)
					.map_err(|e| PayloadError::Encoding(format!("delta {}: {}", delta, e)))
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(OrderParameters::new(
			sell_tokens,
			deltas,
			target,
			self.app_data,
			receiver.unwrap_or(target),
		))
	}

	/// ABI-encodes order parameters.
	pub fn encode(&self, params: &OrderParameters) -> Bytes {
		let data = ReplicationOrderData {
			sellTokens: params.sell_tokens.clone(),
			deltas: params.deltas.clone(),
			target: params.target,
			appData: params.app_data,
			receiver: params.receiver,
			partiallyFillable: params.partially_fillable,
			validity: params.validity,
			priceFeeds: params.price_feeds.clone(),
			maxTimeSinceLastOracleUpdate: params.max_oracle_staleness,
		};
		data.abi_encode().into()
	}

	/// Builds and encodes the order replicating `target`.
	pub fn encode_for(
		&self,
		target: Address,
		receiver: Option<Address>,
	) -> Result<Bytes, PayloadError> {
		let params = self.parameters(target, receiver)?;
		debug!(target = %target, receiver = %params.receiver, "encoding replication order");
		Ok(self.encode(&params))
	}

	/// Decodes bytes produced by [`OrderEncoder::encode`].
	pub fn decode(&self, data: &[u8]) -> Result<OrderParameters, PayloadError> {
		let decoded = <ReplicationOrderData as SolValue>::abi_decode(data)
			.map_err(|e| PayloadError::Encoding(e.to_string()))?;

		Ok(OrderParameters {
			sell_tokens: decoded.sellTokens,
			deltas: decoded.deltas,
			target: decoded.target,
			app_data: decoded.appData,
			receiver: decoded.receiver,
			partially_fillable: decoded.partiallyFillable,
			validity: decoded.validity,
			price_feeds: decoded.priceFeeds,
			max_oracle_staleness: decoded.maxTimeSinceLastOracleUpdate,
		})
	}

	/// Wraps encoded order parameters into a `create` call on the order
	/// manager, ready for a wallet to sign.
	pub fn create_call(&self, static_input: Bytes, from: Option<Address>) -> Transaction {
		let data = IComposableCow::createCall {
			params: ConditionalOrderParams {
				handler: self.handler,
				salt: self.salt,
				staticInput: static_input,
			},
			dispatch: self.dispatch,
		}
		.abi_encode();

		Transaction {
			from,
			to: self.composable_cow,
			data: data.into(),
			value: U256::ZERO,
			chain_id: self.chain_id,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use replicator_types::{parse_address, MAX_ORACLE_STALENESS_SECS, ORDER_VALIDITY_SECS};

	const TARGET: &str = "0x538d72dEd42A76A30f730292Da939e0577f22F57";

	fn encoder() -> OrderEncoder {
		OrderEncoder::from_config(&ReplicatorConfig::default()).unwrap()
	}

	#[test]
	fn test_encoding_is_deterministic() {
		let encoder = encoder();
		let target = parse_address(TARGET).unwrap();
		assert_eq!(
			encoder.encode_for(target, None).unwrap(),
			encoder.encode_for(target, None).unwrap()
		);
	}

	#[test]
	fn test_fixed_fields_are_encoded() {
		let encoder = encoder();
		let target = parse_address(TARGET).unwrap();
		let decoded = encoder
			.decode(&encoder.encode_for(target, None).unwrap())
			.unwrap();

		assert!(!decoded.partially_fillable);
		assert_eq!(decoded.validity, ORDER_VALIDITY_SECS);
		assert_eq!(decoded.validity, 600);
		assert_eq!(
			decoded.max_oracle_staleness,
			U256::from(MAX_ORACLE_STALENESS_SECS)
		);
		assert_eq!(decoded.max_oracle_staleness, U256::from(3600));
		assert!(decoded.price_feeds.is_empty());
		assert_eq!(decoded.target, target);
		assert_eq!(decoded.receiver, target);
	}

	#[test]
	fn test_token_pair_is_resolved_from_table() {
		let config = ReplicatorConfig::default();
		let network = config.network().unwrap();
		let params = encoder()
			.parameters(Address::repeat_byte(0x01), Some(Address::repeat_byte(0x02)))
			.unwrap();

		assert_eq!(
			params.sell_tokens,
			vec![network.token("WETH").unwrap(), network.token("DAI").unwrap()]
		);
		assert_eq!(
			params.deltas,
			vec![I256::try_from(500i64).unwrap(), I256::try_from(-500i64).unwrap()]
		);
		assert_eq!(params.receiver, Address::repeat_byte(0x02));
	}

	#[test]
	fn test_encoding_is_a_single_offset_prefixed_tuple() {
		let encoded = encoder().encode_for(Address::ZERO, None).unwrap();
		assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32));
		assert_eq!(encoded.len() % 32, 0);
	}

	#[test]
	fn test_unknown_token_is_an_error() {
		let mut config = ReplicatorConfig::default();
		config.order.sell_tokens = vec!["WETH".to_string(), "MARIO".to_string()];
		let encoder = OrderEncoder::from_config(&config).unwrap();

		assert!(matches!(
			encoder.encode_for(Address::ZERO, None),
			Err(PayloadError::TokenNotFound(symbol)) if symbol == "MARIO"
		));
	}

	#[test]
	fn test_length_mismatch_is_an_error() {
		let mut config = ReplicatorConfig::default();
		config.order.deltas = vec![500, -250, -250];
		let encoder = OrderEncoder::from_config(&config).unwrap();

		assert!(matches!(
			encoder.parameters(Address::ZERO, None),
			Err(PayloadError::LengthMismatch { tokens: 2, deltas: 3 })
		));
	}

	#[test]
	fn test_create_call_wraps_static_input() {
		let encoder = encoder();
		let static_input = encoder.encode_for(Address::repeat_byte(0x07), None).unwrap();
		let from = Address::repeat_byte(0x09);
		let tx = encoder.create_call(static_input.clone(), Some(from));

		let config = ReplicatorConfig::default();
		assert_eq!(tx.to, config.network().unwrap().contracts.composable_cow);
		assert_eq!(tx.from, Some(from));
		assert_eq!(tx.value, U256::ZERO);
		assert_eq!(tx.chain_id, ChainId::GOERLI);

		let call = <IComposableCow::createCall as SolCall>::abi_decode(&tx.data).unwrap();
		assert_eq!(call.params.staticInput, static_input);
		assert_eq!(call.params.handler, config.conditional_order.handler);
		assert!(call.dispatch);
	}
}
