//! API types for the replicator HTTP API.

use crate::{
	common::{Address, Bytes},
	delivery::{SubmissionId, SubmissionStatus},
	portfolio::{Allocation, PortfolioListing},
};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

/// Listing row together with its navigation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRow {
	#[serde(flatten)]
	pub listing: PortfolioListing,
	pub link: String,
}

/// Detail view for one target address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestView {
	/// Target address whose portfolio is replicated.
	pub address: Address,
	/// Target allocation shown to the user.
	pub allocation: Vec<Allocation>,
	/// Listing rows seeded for this address, if any.
	pub listings: Vec<PortfolioListing>,
	/// Explanation of the replication mechanism.
	pub explanation: String,
	/// ABI-encoded order parameters for this target.
	pub encoded_order: Bytes,
}

/// Records the Safe created for an owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSafeRequest {
	pub safe: Address,
}

/// Snapshot of an owner's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
	pub owner: Address,
	pub safe: Option<Address>,
}

/// Request to submit a replication order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
	/// Wallet account that sends the transaction.
	pub from: Option<Address>,
	/// Owner whose session Safe receives the bought tokens.
	pub owner: Option<Address>,
}

/// Result of submitting a replication order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
	pub id: SubmissionId,
	pub status: SubmissionStatus,
}
