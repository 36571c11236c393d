//! Calldata encoding for batch call descriptors.
//!
//! The batch format describes each call by its method ABI and literal
//! argument strings. Encoding them here lets a batch be executed directly,
//! without going through the transaction-builder UI.

use crate::PayloadError;
use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{keccak256, Bytes};
use replicator_types::{ContractCallDescriptor, MethodInput};

/// Encodes a descriptor into selector-prefixed calldata.
pub fn encode_call(descriptor: &ContractCallDescriptor) -> Result<Bytes, PayloadError> {
	let method = &descriptor.contract_method;

	let mut args = Vec::with_capacity(method.inputs.len());
	for input in &method.inputs {
		let literal = descriptor
			.input(&input.name)
			.ok_or_else(|| PayloadError::MissingArgument(input.name.clone()))?;
		args.push(coerce_input(input, literal)?);
	}

	let selector = keccak256(method.signature().as_bytes());
	let mut data = selector[..4].to_vec();
	data.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());

	Ok(data.into())
}

/// Converts a literal argument into a typed ABI value.
///
/// Tuples are written as JSON arrays of their component literals.
fn coerce_input(input: &MethodInput, literal: &str) -> Result<DynSolValue, PayloadError> {
	if input.kind == "tuple" {
		let items: Vec<serde_json::Value> = serde_json::from_str(literal).map_err(|e| {
			PayloadError::Encoding(format!("'{}' is not a JSON array: {}", input.name, e))
		})?;

		if items.len() != input.components.len() {
			return Err(PayloadError::Encoding(format!(
				"'{}' expects {} components, got {}",
				input.name,
				input.components.len(),
				items.len()
			)));
		}

		let fields = input
			.components
			.iter()
			.zip(items)
			.map(|(component, item)| {
				let item = match item {
					serde_json::Value::String(s) => s,
					other => other.to_string(),
				};
				coerce_input(component, &item)
			})
			.collect::<Result<Vec<_>, _>>()?;

		return Ok(DynSolValue::Tuple(fields));
	}

	let ty = DynSolType::parse(&input.kind)
		.map_err(|e| PayloadError::Encoding(format!("'{}': {}", input.name, e)))?;
	ty.coerce_str(literal)
		.map_err(|e| PayloadError::Encoding(format!("'{}': {}", input.name, e)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::contracts::{
		ConditionalOrderParams, IComposableCow, IERC20, ISafe, ISignatureVerifierMuxer,
	};
	use crate::BatchBuilder;
	use alloy::primitives::U256;
	use alloy::sol_types::SolCall;
	use replicator_config::ReplicatorConfig;
	use replicator_types::{Address, ContractMethod};

	fn batch_calldata() -> (Address, Vec<Bytes>) {
		let config = ReplicatorConfig::default();
		let safe = Address::repeat_byte(0x42);
		let batch = BatchBuilder::from_config(&config).unwrap().build(safe);
		let data = batch
			.transactions
			.iter()
			.map(|tx| encode_call(tx).unwrap())
			.collect();
		(safe, data)
	}

	#[test]
	fn test_selectors_match_solidity_signatures() {
		let (_, data) = batch_calldata();
		assert_eq!(data[0][..4], ISafe::setFallbackHandlerCall::SELECTOR);
		assert_eq!(data[1][..4], ISignatureVerifierMuxer::setDomainVerifierCall::SELECTOR);
		assert_eq!(data[2][..4], IERC20::approveCall::SELECTOR);
		assert_eq!(data[3][..4], IComposableCow::createCall::SELECTOR);
	}

	#[test]
	fn test_calldata_matches_static_bindings() {
		let config = ReplicatorConfig::default();
		let network = config.network().unwrap();
		let (_, data) = batch_calldata();

		let expected = ISafe::setFallbackHandlerCall {
			handler: network.contracts.fallback_handler,
		}
		.abi_encode();
		assert_eq!(data[0].to_vec(), expected);

		let expected = ISignatureVerifierMuxer::setDomainVerifierCall {
			domainSeparator: network.domain_separator,
			newVerifier: network.contracts.domain_verifier,
		}
		.abi_encode();
		assert_eq!(data[1].to_vec(), expected);

		let expected = IERC20::approveCall {
			spender: network.contracts.vault_relayer,
			value: U256::MAX,
		}
		.abi_encode();
		assert_eq!(data[2].to_vec(), expected);

		let expected = IComposableCow::createCall {
			params: ConditionalOrderParams {
				handler: config.conditional_order.handler,
				salt: config.conditional_order.salt,
				staticInput: config.conditional_order.static_input.clone(),
			},
			dispatch: true,
		}
		.abi_encode();
		assert_eq!(data[3].to_vec(), expected);
	}

	#[test]
	fn test_missing_argument() {
		let descriptor = ContractCallDescriptor::new(
			Address::ZERO,
			ContractMethod::new("setFallbackHandler", vec![MethodInput::new("handler", "address")]),
		);
		assert!(matches!(
			encode_call(&descriptor),
			Err(PayloadError::MissingArgument(name)) if name == "handler"
		));
	}

	#[test]
	fn test_tuple_arity_mismatch() {
		let descriptor = ContractCallDescriptor::new(
			Address::ZERO,
			ContractMethod::new(
				"create",
				vec![MethodInput::new("params", "tuple").with_components(vec![
					MethodInput::new("handler", "address"),
					MethodInput::new("salt", "bytes32"),
				])],
			),
		)
		.with_input("params", "[\"0x2222222222222222222222222222222222222222\"]");
		assert!(matches!(encode_call(&descriptor), Err(PayloadError::Encoding(_))));
	}
}
