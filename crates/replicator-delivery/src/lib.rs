//! Transaction delivery for the replicator.
//!
//! This module hands wallet-bound transactions to a delivery backend and
//! tracks each submission from preparation to a terminal state. Backends
//! implement [`DeliveryInterface`]; the shipped backend talks to a wallet
//! JSON-RPC endpoint through Alloy.

use async_trait::async_trait;
use replicator_types::{SubmissionId, Transaction, TransactionHash, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod mock;
}

mod tracker;

pub use tracker::SubmissionTracker;

/// Errors that can occur during transaction delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs when no wallet endpoint is configured.
	#[error("No wallet RPC endpoint configured")]
	NotConfigured,
	/// Error that occurs when the endpoint cannot be reached or answers garbage.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the wallet refuses to sign or broadcast.
	#[error("Wallet rejected transaction: {0}")]
	Rejected(String),
	/// Error that occurs when a submission id is not tracked.
	#[error("Submission not found: {0}")]
	NotFound(SubmissionId),
	/// Error that occurs when an operation does not apply to the current state.
	#[error("Cannot {action} a submission that is {state}")]
	InvalidTransition {
		state: &'static str,
		action: &'static str,
	},
}

/// Trait defining the interface for transaction delivery backends.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Hands the transaction to the wallet and returns its hash once broadcast.
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Looks up the receipt of a broadcast transaction.
	///
	/// Returns `None` while the transaction is not yet included.
	async fn receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError>;
}

/// Shortens a hash for log lines.
pub(crate) fn truncate_hash(hash: &TransactionHash) -> String {
	let hash_str = hex::encode(hash.0);
	format!("{}..", &hash_str[..8])
}
