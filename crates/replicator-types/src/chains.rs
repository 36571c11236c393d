//! Chain identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
	pub const ETHEREUM: Self = Self(1);
	pub const GOERLI: Self = Self(5);
	pub const GNOSIS: Self = Self(100);
	pub const SEPOLIA: Self = Self(11155111);
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(ChainId(s.parse()?))
	}
}

/// Serializes a [`ChainId`] as a decimal string, the way the Safe
/// transaction builder writes `chainId`. Bare integers are accepted on input.
pub mod chain_id_string {
	use super::ChainId;
	use serde::{de, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(chain_id: &ChainId, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&chain_id.0.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<ChainId, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Text(String),
			Number(u64),
		}

		match Raw::deserialize(deserializer)? {
			Raw::Text(s) => s
				.parse::<ChainId>()
				.map_err(|_| de::Error::custom(format!("Invalid chain ID: {}", s))),
			Raw::Number(n) => Ok(ChainId(n)),
		}
	}
}
