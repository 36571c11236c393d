//! Error types for the replicator system.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplicatorError>;

#[derive(Error, Debug)]
pub enum ReplicatorError {
	#[error("Invalid address '{input}': {reason}")]
	InvalidAddress { input: String, reason: String },

	#[error("Invalid hex value '{input}': {reason}")]
	InvalidHex { input: String, reason: String },

	#[error("Token not found: {0}")]
	TokenNotFound(String),

	#[error("Unknown network: {0}")]
	UnknownNetwork(crate::chains::ChainId),

	#[error("Encoding error: {0}")]
	Encoding(String),

	#[error("Configuration error: {0}")]
	Config(String),
}
