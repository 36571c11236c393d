//! Transaction batch types.
//!
//! These mirror the JSON batch file understood by the Safe transaction
//! builder: a versioned envelope holding an ordered list of contract calls,
//! each described by its method ABI and the literal argument values.

use crate::{chains::ChainId, common::Address, common::Bytes, common::TimestampMillis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Batch file format version written by this crate.
pub const BATCH_FORMAT_VERSION: &str = "1.0";

/// A batch of contract calls to be executed by a smart account.
///
/// The order of `transactions` is significant and must be preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBatchPayload {
	/// Batch file format version.
	pub version: String,
	/// Chain the batch targets, serialized as a decimal string.
	#[serde(with = "crate::chains::chain_id_string")]
	pub chain_id: ChainId,
	/// Creation timestamp in Unix milliseconds.
	pub created_at: TimestampMillis,
	/// Descriptive metadata.
	pub meta: BatchMeta,
	/// Ordered contract calls.
	pub transactions: Vec<ContractCallDescriptor>,
}

impl TransactionBatchPayload {
	/// Method names of the batched calls, in execution order.
	pub fn method_names(&self) -> Vec<&str> {
		self.transactions
			.iter()
			.map(|tx| tx.contract_method.name.as_str())
			.collect()
	}
}

/// Descriptive batch metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
	pub name: String,
	pub description: String,
	pub tx_builder_version: String,
	pub created_from_safe_address: String,
	pub created_from_owner_address: String,
	pub checksum: String,
}

/// One contract call inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallDescriptor {
	/// Contract receiving the call, written in EIP-55 checksum form.
	#[serde(serialize_with = "serialize_checksummed")]
	pub to: Address,
	/// Native value in wei, as a decimal string.
	pub value: String,
	/// Raw calldata. The batch format leaves this `null` when
	/// `contractMethod` and `contractInputsValues` are given.
	pub data: Option<Bytes>,
	/// ABI description of the called method.
	pub contract_method: ContractMethod,
	/// Literal argument values keyed by parameter name.
	pub contract_inputs_values: BTreeMap<String, String>,
}

impl ContractCallDescriptor {
	/// Creates a zero-value call to `to`.
	pub fn new(to: Address, contract_method: ContractMethod) -> Self {
		Self {
			to,
			value: "0".to_string(),
			data: None,
			contract_method,
			contract_inputs_values: BTreeMap::new(),
		}
	}

	/// Sets the literal value of a named argument.
	pub fn with_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.contract_inputs_values.insert(name.into(), value.into());
		self
	}

	/// Looks up the literal value of a named argument.
	pub fn input(&self, name: &str) -> Option<&str> {
		self.contract_inputs_values.get(name).map(String::as_str)
	}
}

fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(&address.to_checksum(None))
}

/// ABI description of a contract method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
	pub inputs: Vec<MethodInput>,
	pub name: String,
	pub payable: bool,
}

impl ContractMethod {
	/// Creates a non-payable method description.
	pub fn new(name: impl Into<String>, inputs: Vec<MethodInput>) -> Self {
		Self {
			inputs,
			name: name.into(),
			payable: false,
		}
	}

	/// Canonical Solidity signature, e.g. `approve(address,uint256)`.
	pub fn signature(&self) -> String {
		let params: Vec<String> = self.inputs.iter().map(MethodInput::canonical_type).collect();
		format!("{}({})", self.name, params.join(","))
	}
}

/// A single ABI parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInput {
	pub internal_type: String,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub components: Vec<MethodInput>,
}

impl MethodInput {
	/// Creates a parameter whose internal type equals its ABI type.
	pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
		let kind = kind.into();
		Self {
			internal_type: kind.clone(),
			name: name.into(),
			kind,
			components: Vec::new(),
		}
	}

	pub fn with_internal_type(mut self, internal_type: impl Into<String>) -> Self {
		self.internal_type = internal_type.into();
		self
	}

	pub fn with_components(mut self, components: Vec<MethodInput>) -> Self {
		self.components = components;
		self
	}

	/// Canonical type string, expanding tuples into their components.
	pub fn canonical_type(&self) -> String {
		match self.kind.strip_prefix("tuple") {
			Some(suffix) => {
				let inner: Vec<String> =
					self.components.iter().map(MethodInput::canonical_type).collect();
				format!("({}){}", inner.join(","), suffix)
			}
			None => self.kind.clone(),
		}
	}
}
