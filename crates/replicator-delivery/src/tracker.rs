//! Submission tracking.
//!
//! Each prepared transaction gets a [`SubmissionId`] and moves through
//! [`SubmissionStatus`]. Cancelling only stops tracking: a transaction the
//! wallet already broadcast stays on chain.

use crate::{truncate_hash, DeliveryError, DeliveryInterface};
use dashmap::{DashMap, DashSet};
use replicator_types::{
	now_millis, SubmissionId, SubmissionStatus, TrackedSubmission, Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracks submissions handed to a delivery backend.
pub struct SubmissionTracker {
	/// The backend, if a wallet endpoint is configured.
	delivery: Option<Arc<dyn DeliveryInterface>>,
	submissions: DashMap<SubmissionId, TrackedSubmission>,
	/// `Idle` submissions currently being handed to the wallet.
	in_flight: DashSet<SubmissionId>,
}

/// Releases an in-flight claim when the submit call ends or is dropped.
struct InFlightClaim<'a> {
	in_flight: &'a DashSet<SubmissionId>,
	id: SubmissionId,
}

impl Drop for InFlightClaim<'_> {
	fn drop(&mut self) {
		self.in_flight.remove(&self.id);
	}
}

impl SubmissionTracker {
	pub fn new(delivery: Option<Arc<dyn DeliveryInterface>>) -> Self {
		Self {
			delivery,
			submissions: DashMap::new(),
			in_flight: DashSet::new(),
		}
	}

	pub fn is_configured(&self) -> bool {
		self.delivery.is_some()
	}

	/// Starts tracking `transaction` in the `Idle` state.
	pub fn prepare(&self, transaction: Transaction) -> TrackedSubmission {
		let now = now_millis();
		let submission = TrackedSubmission {
			id: SubmissionId::new(),
			transaction,
			status: SubmissionStatus::Idle,
			created_at: now,
			updated_at: now,
		};
		debug!(id = %submission.id, to = %submission.transaction.to, "prepared submission");
		self.submissions.insert(submission.id, submission.clone());
		submission
	}

	/// Hands an `Idle` submission to the wallet.
	///
	/// A wallet refusal is recorded as `Failed` and is not an error. Network
	/// errors leave the submission `Idle` so it can be retried. Only one
	/// caller at a time can hand a given submission to the wallet.
	pub async fn submit(&self, id: &SubmissionId) -> Result<TrackedSubmission, DeliveryError> {
		let delivery = self.delivery.as_ref().ok_or(DeliveryError::NotConfigured)?;

		let (transaction, _claim) = {
			let entry = self
				.submissions
				.get_mut(id)
				.ok_or(DeliveryError::NotFound(*id))?;
			if entry.status != SubmissionStatus::Idle {
				return Err(DeliveryError::InvalidTransition {
					state: entry.status.name(),
					action: "submit",
				});
			}
			// Claimed while the entry is locked, so a second caller sees it.
			if !self.in_flight.insert(*id) {
				return Err(DeliveryError::InvalidTransition {
					state: "submitting",
					action: "submit",
				});
			}
			let claim = InFlightClaim {
				in_flight: &self.in_flight,
				id: *id,
			};
			(entry.transaction.clone(), claim)
		};

		let status = match delivery.submit(&transaction).await {
			Ok(hash) => {
				info!(id = %id, tx_hash = %truncate_hash(&hash), "submission pending");
				SubmissionStatus::Pending { hash }
			}
			Err(DeliveryError::Rejected(reason)) => {
				warn!(id = %id, reason = %reason, "submission rejected by wallet");
				SubmissionStatus::Failed { reason, hash: None }
			}
			Err(e) => return Err(e),
		};

		self.transition(id, status)
	}

	/// Prepares and submits in one step.
	pub async fn prepare_and_submit(
		&self,
		transaction: Transaction,
	) -> Result<TrackedSubmission, DeliveryError> {
		if !self.is_configured() {
			return Err(DeliveryError::NotConfigured);
		}
		let submission = self.prepare(transaction);
		self.submit(&submission.id).await
	}

	/// Checks a `Pending` submission for inclusion.
	///
	/// Terminal submissions are returned unchanged.
	pub async fn poll(&self, id: &SubmissionId) -> Result<TrackedSubmission, DeliveryError> {
		let current = self.get(id)?;
		let hash = match &current.status {
			SubmissionStatus::Pending { hash } => *hash,
			SubmissionStatus::Idle => {
				return Err(DeliveryError::InvalidTransition {
					state: current.status.name(),
					action: "poll",
				})
			}
			_ => return Ok(current),
		};

		let delivery = self.delivery.as_ref().ok_or(DeliveryError::NotConfigured)?;
		let Some(receipt) = delivery.receipt(&hash).await? else {
			return Ok(current);
		};

		let status = if receipt.success {
			info!(id = %id, block = receipt.block_number, "submission confirmed");
			SubmissionStatus::Confirmed { receipt }
		} else {
			warn!(id = %id, block = receipt.block_number, "submission reverted");
			SubmissionStatus::Failed {
				reason: "transaction reverted".to_string(),
				hash: Some(hash),
			}
		};

		self.transition(id, status)
	}

	pub fn get(&self, id: &SubmissionId) -> Result<TrackedSubmission, DeliveryError> {
		self.submissions
			.get(id)
			.map(|entry| entry.value().clone())
			.ok_or(DeliveryError::NotFound(*id))
	}

	/// Stops tracking `id` and returns its last known state.
	pub fn cancel(&self, id: &SubmissionId) -> Result<TrackedSubmission, DeliveryError> {
		let (_, submission) = self
			.submissions
			.remove(id)
			.ok_or(DeliveryError::NotFound(*id))?;
		info!(id = %id, state = submission.status.name(), "stopped tracking submission");
		Ok(submission)
	}

	pub fn len(&self) -> usize {
		self.submissions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.submissions.is_empty()
	}

	fn transition(
		&self,
		id: &SubmissionId,
		status: SubmissionStatus,
	) -> Result<TrackedSubmission, DeliveryError> {
		// Cancelled while the backend call was in flight.
		let mut entry = self
			.submissions
			.get_mut(id)
			.ok_or(DeliveryError::NotFound(*id))?;
		debug!(id = %id, from = entry.status.name(), to = status.name(), "submission transition");
		entry.status = status;
		entry.updated_at = now_millis();
		Ok(entry.value().clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::mock::MockDelivery;
	use replicator_types::{Address, Bytes, ChainId, TransactionHash, TransactionReceipt, U256};

	fn transaction() -> Transaction {
		Transaction {
			from: Some(Address::repeat_byte(0x01)),
			to: Address::repeat_byte(0x02),
			data: Bytes::from(vec![0xde, 0xad]),
			value: U256::ZERO,
			chain_id: ChainId::GOERLI,
		}
	}

	fn tracker(delivery: Arc<MockDelivery>) -> SubmissionTracker {
		SubmissionTracker::new(Some(delivery as Arc<dyn DeliveryInterface>))
	}

	#[tokio::test]
	async fn test_submit_then_confirm() {
		let delivery = Arc::new(MockDelivery::accepting());
		let tracker = tracker(delivery.clone());

		let prepared = tracker.prepare(transaction());
		assert_eq!(prepared.status, SubmissionStatus::Idle);

		let pending = tracker.submit(&prepared.id).await.unwrap();
		let SubmissionStatus::Pending { hash } = pending.status else {
			panic!("expected pending, got {:?}", pending.status);
		};
		assert_eq!(delivery.sent(), vec![transaction()]);

		// Not mined yet.
		let polled = tracker.poll(&prepared.id).await.unwrap();
		assert_eq!(polled.status, SubmissionStatus::Pending { hash });

		delivery.include(hash, 42, true);
		let confirmed = tracker.poll(&prepared.id).await.unwrap();
		assert!(matches!(
			confirmed.status,
			SubmissionStatus::Confirmed { ref receipt } if receipt.block_number == 42
		));
		assert!(confirmed.status.is_terminal());
	}

	#[tokio::test]
	async fn test_revert_fails_with_hash() {
		let delivery = Arc::new(MockDelivery::accepting());
		let tracker = tracker(delivery.clone());

		let submission = tracker.prepare_and_submit(transaction()).await.unwrap();
		let SubmissionStatus::Pending { hash } = submission.status else {
			panic!("expected pending");
		};
		delivery.include(hash, 7, false);

		let failed = tracker.poll(&submission.id).await.unwrap();
		assert_eq!(
			failed.status,
			SubmissionStatus::Failed {
				reason: "transaction reverted".to_string(),
				hash: Some(hash),
			}
		);
	}

	#[tokio::test]
	async fn test_wallet_rejection_is_recorded() {
		let tracker = tracker(Arc::new(MockDelivery::rejecting("User denied")));
		let submission = tracker.prepare_and_submit(transaction()).await.unwrap();
		assert_eq!(
			submission.status,
			SubmissionStatus::Failed {
				reason: "User denied".to_string(),
				hash: None,
			}
		);
	}

	#[tokio::test]
	async fn test_invalid_transitions() {
		let tracker = tracker(Arc::new(MockDelivery::accepting()));

		let idle = tracker.prepare(transaction());
		assert!(matches!(
			tracker.poll(&idle.id).await,
			Err(DeliveryError::InvalidTransition { state: "idle", action: "poll" })
		));

		tracker.submit(&idle.id).await.unwrap();
		assert!(matches!(
			tracker.submit(&idle.id).await,
			Err(DeliveryError::InvalidTransition { state: "pending", action: "submit" })
		));
	}

	/// Wallet that yields to the scheduler before answering.
	struct YieldingDelivery(MockDelivery);

	#[async_trait::async_trait]
	impl DeliveryInterface for YieldingDelivery {
		async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
			tokio::task::yield_now().await;
			self.0.submit(tx).await
		}

		async fn receipt(
			&self,
			hash: &TransactionHash,
		) -> Result<Option<TransactionReceipt>, DeliveryError> {
			self.0.receipt(hash).await
		}
	}

	#[tokio::test]
	async fn test_concurrent_submit_broadcasts_once() {
		let delivery = Arc::new(YieldingDelivery(MockDelivery::accepting()));
		let tracker = SubmissionTracker::new(Some(delivery.clone() as Arc<dyn DeliveryInterface>));
		let prepared = tracker.prepare(transaction());

		let (a, b) = tokio::join!(tracker.submit(&prepared.id), tracker.submit(&prepared.id));
		let (ok, err) = if a.is_ok() { (a, b) } else { (b, a) };

		let SubmissionStatus::Pending { hash } = ok.unwrap().status else {
			panic!("expected pending");
		};
		assert!(matches!(
			err,
			Err(DeliveryError::InvalidTransition { action: "submit", .. })
		));
		assert_eq!(delivery.0.sent().len(), 1);
		assert_eq!(
			tracker.get(&prepared.id).unwrap().status,
			SubmissionStatus::Pending { hash }
		);
	}

	#[tokio::test]
	async fn test_failed_network_call_releases_claim() {
		struct Unreachable;

		#[async_trait::async_trait]
		impl DeliveryInterface for Unreachable {
			async fn submit(&self, _tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
				Err(DeliveryError::Network("connection refused".to_string()))
			}

			async fn receipt(
				&self,
				_hash: &TransactionHash,
			) -> Result<Option<TransactionReceipt>, DeliveryError> {
				Ok(None)
			}
		}

		let tracker = SubmissionTracker::new(Some(Arc::new(Unreachable) as Arc<dyn DeliveryInterface>));
		let prepared = tracker.prepare(transaction());

		for _ in 0..2 {
			assert!(matches!(
				tracker.submit(&prepared.id).await,
				Err(DeliveryError::Network(_))
			));
		}
		assert_eq!(tracker.get(&prepared.id).unwrap().status, SubmissionStatus::Idle);
	}

	#[tokio::test]
	async fn test_cancel_stops_tracking() {
		let tracker = tracker(Arc::new(MockDelivery::accepting()));
		let submission = tracker.prepare_and_submit(transaction()).await.unwrap();

		let last = tracker.cancel(&submission.id).unwrap();
		assert_eq!(last.status.name(), "pending");
		assert!(tracker.is_empty());
		assert!(matches!(
			tracker.get(&submission.id),
			Err(DeliveryError::NotFound(_))
		));
		assert!(matches!(
			tracker.cancel(&submission.id),
			Err(DeliveryError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn test_unconfigured_tracker() {
		let tracker = SubmissionTracker::new(None);
		assert!(!tracker.is_configured());
		assert!(matches!(
			tracker.prepare_and_submit(transaction()).await,
			Err(DeliveryError::NotConfigured)
		));
		assert!(tracker.is_empty());
	}
}
