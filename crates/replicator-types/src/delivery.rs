//! Transaction delivery types for the replicator system.
//!
//! This module defines the wallet-bound transaction request, transaction
//! hashes and receipts, and the status a tracked submission moves through.

use crate::{
	chains::ChainId,
	common::{Address, Bytes, TimestampMillis, B256, U256},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Contract call to be signed and broadcast by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Sender. `None` lets the wallet choose its default account.
	pub from: Option<Address>,
	/// Called contract.
	pub to: Address,
	/// Calldata.
	pub data: Bytes,
	/// Native value in wei.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: ChainId,
}

/// Blockchain transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Transaction receipt containing execution details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// Identifier of a tracked submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub uuid::Uuid);

impl SubmissionId {
	pub fn new() -> Self {
		Self(uuid::Uuid::new_v4())
	}
}

impl Default for SubmissionId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for SubmissionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for SubmissionId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(s.parse()?))
	}
}

/// Lifecycle of one submitted transaction.
///
/// `Idle` → `Pending` → `Confirmed` | `Failed`; `Idle` may also go straight
/// to `Failed` when the wallet rejects the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
	/// Prepared but not yet handed to the wallet.
	Idle,
	/// Broadcast and awaiting inclusion.
	Pending { hash: TransactionHash },
	/// Included and executed successfully.
	Confirmed { receipt: TransactionReceipt },
	/// Rejected by the wallet, or reverted on chain.
	Failed {
		reason: String,
		hash: Option<TransactionHash>,
	},
}

impl SubmissionStatus {
	/// Returns true once no further transition is possible.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
	}

	/// Short name of the state, for logs and errors.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Pending { .. } => "pending",
			Self::Confirmed { .. } => "confirmed",
			Self::Failed { .. } => "failed",
		}
	}
}

/// A transaction together with its tracked status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSubmission {
	pub id: SubmissionId,
	pub transaction: Transaction,
	pub status: SubmissionStatus,
	pub created_at: TimestampMillis,
	pub updated_at: TimestampMillis,
}
