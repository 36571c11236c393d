//! In-memory delivery backend.
//!
//! Records every submitted transaction and answers receipt lookups from a
//! table the caller fills in. Used for dry runs and in tests.

use crate::{DeliveryError, DeliveryInterface};
use async_trait::async_trait;
use dashmap::DashMap;
use replicator_types::{Transaction, TransactionHash, TransactionReceipt, B256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Delivery that never leaves the process.
#[derive(Default)]
pub struct MockDelivery {
	rejection: Option<String>,
	nonce: AtomicU64,
	sent: Mutex<Vec<Transaction>>,
	receipts: DashMap<TransactionHash, TransactionReceipt>,
}

impl MockDelivery {
	/// A wallet that accepts everything.
	pub fn accepting() -> Self {
		Self::default()
	}

	/// A wallet that refuses every request with `reason`.
	pub fn rejecting(reason: impl Into<String>) -> Self {
		Self {
			rejection: Some(reason.into()),
			..Self::default()
		}
	}

	/// Marks `hash` as included at `block_number`.
	pub fn include(&self, hash: TransactionHash, block_number: u64, success: bool) {
		self.receipts.insert(
			hash,
			TransactionReceipt {
				hash,
				block_number,
				success,
			},
		);
	}

	/// Transactions received so far, in order.
	pub fn sent(&self) -> Vec<Transaction> {
		self.sent
			.lock()
			.map(|sent| sent.clone())
			.unwrap_or_default()
	}
}

#[async_trait]
impl DeliveryInterface for MockDelivery {
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
		if let Some(reason) = &self.rejection {
			return Err(DeliveryError::Rejected(reason.clone()));
		}

		if let Ok(mut sent) = self.sent.lock() {
			sent.push(tx.clone());
		}

		// Hashes only need to be unique per backend.
		let nonce = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
		Ok(TransactionHash(B256::left_padding_from(&nonce.to_be_bytes())))
	}

	async fn receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		Ok(self.receipts.get(hash).map(|entry| entry.value().clone()))
	}
}
