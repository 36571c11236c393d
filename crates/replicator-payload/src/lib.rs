//! Payload construction for the portfolio replicator.
//!
//! This crate turns configuration constants into the two artifacts the rest
//! of the system ships to a wallet: the Safe setup batch (fallback handler,
//! domain verifier, token approval, conditional order registration) and the
//! ABI-encoded rebalancing order parameters.

use replicator_types::ReplicatorError;
use thiserror::Error;

pub mod batch;
pub mod calldata;
pub mod contracts;
pub mod order;

pub use batch::BatchBuilder;
pub use calldata::encode_call;
pub use order::OrderEncoder;

/// Errors that can occur while building payloads.
#[derive(Debug, Error)]
pub enum PayloadError {
	/// The input is not a well-formed address.
	#[error("Invalid address '{input}': {reason}")]
	InvalidAddress { input: String, reason: String },
	/// A token symbol is missing from the network's token table.
	#[error("Token not found: {0}")]
	TokenNotFound(String),
	/// Sell tokens and deltas are not paired one to one.
	#[error("Order has {tokens} sell tokens but {deltas} deltas")]
	LengthMismatch { tokens: usize, deltas: usize },
	/// A call descriptor lacks a value for one of its parameters.
	#[error("Missing value for argument '{0}'")]
	MissingArgument(String),
	/// ABI encoding or decoding failed.
	#[error("Encoding failed: {0}")]
	Encoding(String),
	/// The configuration cannot be used to build payloads.
	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<ReplicatorError> for PayloadError {
	fn from(err: ReplicatorError) -> Self {
		match err {
			ReplicatorError::InvalidAddress { input, reason } => {
				PayloadError::InvalidAddress { input, reason }
			}
			ReplicatorError::TokenNotFound(symbol) => PayloadError::TokenNotFound(symbol),
			ReplicatorError::Encoding(msg) => PayloadError::Encoding(msg),
			other => PayloadError::Config(other.to_string()),
		}
	}
}
