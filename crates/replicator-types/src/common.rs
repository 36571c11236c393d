//! Common types used throughout the replicator system.

use crate::errors::{ReplicatorError, Result};

// Re-export commonly used ethereum types
pub use alloy::primitives::{Address, Bytes, B256, I256, U256};

/// Timestamp (Unix milliseconds)
pub type TimestampMillis = u64;

/// Parses a `0x`-prefixed, 20-byte hex address.
///
/// Mixed-case input is accepted without checksum verification, matching
/// how wallets and block explorers hand addresses around.
pub fn parse_address(input: &str) -> Result<Address> {
	let hex_part = strip_hex_prefix(input)?;
	if hex_part.len() != 40 {
		return Err(ReplicatorError::InvalidAddress {
			input: input.to_string(),
			reason: format!("expected 40 hex characters, got {}", hex_part.len()),
		});
	}

	hex_part
		.parse::<Address>()
		.map_err(|e| ReplicatorError::InvalidAddress {
			input: input.to_string(),
			reason: e.to_string(),
		})
}

/// Parses a `0x`-prefixed 32-byte hex word.
pub fn parse_b256(input: &str) -> Result<B256> {
	let hex_part = strip_hex_prefix(input).map_err(|_| ReplicatorError::InvalidHex {
		input: input.to_string(),
		reason: "missing 0x prefix".to_string(),
	})?;
	if hex_part.len() != 64 {
		return Err(ReplicatorError::InvalidHex {
			input: input.to_string(),
			reason: format!("expected 64 hex characters, got {}", hex_part.len()),
		});
	}

	hex_part.parse::<B256>().map_err(|e| ReplicatorError::InvalidHex {
		input: input.to_string(),
		reason: e.to_string(),
	})
}

/// Parses `0x`-prefixed hex of any even length.
pub fn parse_bytes(input: &str) -> Result<Bytes> {
	let hex_part = strip_hex_prefix(input).map_err(|_| ReplicatorError::InvalidHex {
		input: input.to_string(),
		reason: "missing 0x prefix".to_string(),
	})?;

	alloy::hex::decode(hex_part)
		.map(Bytes::from)
		.map_err(|e| ReplicatorError::InvalidHex {
			input: input.to_string(),
			reason: e.to_string(),
		})
}

fn strip_hex_prefix(input: &str) -> Result<&str> {
	input
		.strip_prefix("0x")
		.ok_or_else(|| ReplicatorError::InvalidAddress {
			input: input.to_string(),
			reason: "missing 0x prefix".to_string(),
		})
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> TimestampMillis {
	chrono::Utc::now().timestamp_millis().max(0) as u64
}
