//! Alloy-based wallet delivery.
//!
//! Transactions are sent unsigned with `eth_sendTransaction`, so the
//! endpoint must be a wallet (or a node with unlocked accounts) that signs
//! on the user's behalf. No key material ever reaches this process.

use crate::{truncate_hash, DeliveryError, DeliveryInterface};
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use replicator_types::{ChainId, Transaction, TransactionHash, TransactionReceipt};
use tracing::{debug, info, warn};

/// Delivery through a wallet JSON-RPC endpoint.
pub struct AlloyDelivery {
	/// The Alloy provider for the wallet endpoint.
	provider: DynProvider,
	/// The chain the endpoint is expected to serve.
	chain_id: ChainId,
}

impl AlloyDelivery {
	/// Creates a delivery bound to `rpc_url`.
	///
	/// Fillers are disabled; the wallet picks nonce, gas and fees itself.
	pub fn new(rpc_url: &str, chain_id: ChainId) -> Result<Self, DeliveryError> {
		let url = Url::parse(rpc_url)
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new()
			.disable_recommended_fillers()
			.connect_http(url);

		Ok(Self {
			provider: DynProvider::new(provider),
			chain_id,
		})
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain_id
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn submit(&self, tx: &Transaction) -> Result<TransactionHash, DeliveryError> {
		if tx.chain_id != self.chain_id {
			return Err(DeliveryError::Rejected(format!(
				"transaction targets chain {} but the wallet serves chain {}",
				tx.chain_id, self.chain_id
			)));
		}

		let mut request = TransactionRequest::default()
			.with_to(tx.to)
			.with_input(tx.data.clone())
			.with_value(tx.value)
			.with_chain_id(tx.chain_id.0);
		if let Some(from) = tx.from {
			request = request.with_from(from);
		}

		let pending = self.provider.send_transaction(request).await.map_err(|e| {
			// A JSON-RPC error object means the wallet answered and said no.
			if let Some(resp) = e.as_error_resp() {
				warn!(code = resp.code, "wallet rejected transaction");
				DeliveryError::Rejected(resp.message.to_string())
			} else {
				DeliveryError::Network(format!("Failed to send transaction: {}", e))
			}
		})?;

		let hash = TransactionHash(*pending.tx_hash());
		info!(tx_hash = %truncate_hash(&hash), "Submitted transaction");
		Ok(hash)
	}

	async fn receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash.0)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?;

		let Some(receipt) = receipt else {
			debug!(tx_hash = %truncate_hash(hash), "transaction not yet mined");
			return Ok(None);
		};

		Ok(Some(TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash()),
			block_number: receipt.block_number().unwrap_or(0),
			success: receipt.status(),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_url_is_rejected() {
		assert!(matches!(
			AlloyDelivery::new("not a url", ChainId::GOERLI),
			Err(DeliveryError::Network(_))
		));
	}

	#[test]
	fn test_valid_url_builds_without_connecting() {
		let delivery = AlloyDelivery::new("http://127.0.0.1:8545", ChainId::GOERLI).unwrap();
		assert_eq!(delivery.chain_id(), ChainId::GOERLI);
	}

	#[tokio::test]
	async fn test_chain_mismatch_is_rejected_before_sending() {
		let delivery = AlloyDelivery::new("http://127.0.0.1:1", ChainId::GOERLI).unwrap();
		let tx = Transaction {
			from: None,
			to: Default::default(),
			data: Default::default(),
			value: Default::default(),
			chain_id: ChainId::ETHEREUM,
		};
		assert!(matches!(
			delivery.submit(&tx).await,
			Err(DeliveryError::Rejected(_))
		));
	}
}
