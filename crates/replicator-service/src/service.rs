//! Replicator service.
//!
//! Holds every component built from configuration and implements the
//! operations behind the HTTP routes and CLI subcommands.

use replicator_config::ReplicatorConfig;
use replicator_delivery::{
	implementations::evm::alloy::AlloyDelivery, DeliveryError, DeliveryInterface,
	SubmissionTracker,
};
use replicator_payload::{BatchBuilder, OrderEncoder, PayloadError};
use replicator_portfolio::{implementations::seed::SeedCatalog, CatalogError, CatalogService};
use replicator_types::{
	parse_address, Address, Bytes, InvestView, PortfolioRow, SessionResponse, SubmissionId,
	SubmissionStatus, SubmitOrderRequest, SubmitOrderResponse, TrackedSubmission,
	TransactionBatchPayload,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

use crate::session::SessionContext;

/// Errors surfaced by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
	#[error(transparent)]
	Payload(#[from] PayloadError),
	#[error(transparent)]
	Catalog(#[from] CatalogError),
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
}

/// The replicator service.
pub struct ReplicatorService {
	config: ReplicatorConfig,
	batch: BatchBuilder,
	orders: OrderEncoder,
	catalog: CatalogService,
	tracker: SubmissionTracker,
	sessions: SessionContext,
}

impl ReplicatorService {
	/// Builds the service, connecting the wallet endpoint if one is configured.
	pub fn new(config: ReplicatorConfig) -> Result<Self, ServiceError> {
		let delivery = match &config.delivery.rpc_url {
			Some(url) => {
				info!(chain_id = %config.default_network, "wallet delivery enabled");
				let delivery = AlloyDelivery::new(url, config.default_network)?;
				Some(Arc::new(delivery) as Arc<dyn DeliveryInterface>)
			}
			None => {
				info!("no wallet RPC configured, order submission disabled");
				None
			}
		};

		Self::with_delivery(config, delivery)
	}

	/// Builds the service around an explicit delivery backend.
	pub fn with_delivery(
		config: ReplicatorConfig,
		delivery: Option<Arc<dyn DeliveryInterface>>,
	) -> Result<Self, ServiceError> {
		Ok(Self {
			batch: BatchBuilder::from_config(&config)?,
			orders: OrderEncoder::from_config(&config)?,
			catalog: CatalogService::new(Box::new(SeedCatalog::new())),
			tracker: SubmissionTracker::new(delivery),
			sessions: SessionContext::new(),
			config,
		})
	}

	pub fn config(&self) -> &ReplicatorConfig {
		&self.config
	}

	pub fn delivery_enabled(&self) -> bool {
		self.tracker.is_configured()
	}

	pub async fn portfolios(&self) -> Result<Vec<PortfolioRow>, ServiceError> {
		Ok(self.catalog.rows().await?)
	}

	/// Invest view for `address`.
	///
	/// When `owner` has a recorded Safe, the encoded order pays out to it.
	#[instrument(skip(self))]
	pub async fn invest_view(
		&self,
		address: &str,
		owner: Option<&str>,
	) -> Result<InvestView, ServiceError> {
		let target = address_param(address)?;
		let receiver = match owner {
			Some(owner) => self.sessions.safe_of(&address_param(owner)?),
			None => None,
		};

		let encoded = self.orders.encode_for(target, receiver)?;
		Ok(self.catalog.invest_view(target, encoded).await?)
	}

	/// Encoded order parameters replicating `target`.
	pub fn encode_order(
		&self,
		target: &str,
		receiver: Option<&str>,
	) -> Result<Bytes, ServiceError> {
		let receiver = receiver.map(address_param).transpose()?;
		Ok(self.orders.encode_for(address_param(target)?, receiver)?)
	}

	/// Setup batch for `safe`.
	pub fn safe_batch(&self, safe: &str) -> Result<TransactionBatchPayload, ServiceError> {
		Ok(self.batch.build_from_str(safe)?)
	}

	pub fn register_safe(&self, owner: &str, safe: Address) -> Result<SessionResponse, ServiceError> {
		let owner = address_param(owner)?;
		self.sessions.record_safe(owner, safe);
		Ok(SessionResponse {
			owner,
			safe: Some(safe),
		})
	}

	pub fn session(&self, owner: &str) -> Result<SessionResponse, ServiceError> {
		let owner = address_param(owner)?;
		Ok(SessionResponse {
			owner,
			safe: self.sessions.safe_of(&owner),
		})
	}

	/// Registers the replication order for `target` through the wallet.
	#[instrument(skip(self, request))]
	pub async fn submit_order(
		&self,
		target: &str,
		request: SubmitOrderRequest,
	) -> Result<SubmitOrderResponse, ServiceError> {
		let target = address_param(target)?;
		let receiver = request
			.owner
			.as_ref()
			.and_then(|owner| self.sessions.safe_of(owner));

		let static_input = self.orders.encode_for(target, receiver)?;
		let transaction = self
			.orders
			.create_call(static_input, request.from.or(request.owner));

		let submission = self.tracker.prepare_and_submit(transaction).await?;
		info!(id = %submission.id, state = submission.status.name(), "order submitted");

		Ok(SubmitOrderResponse {
			id: submission.id,
			status: submission.status,
		})
	}

	/// Current state of a submission, refreshed from the chain while pending.
	pub async fn submission(&self, id: &str) -> Result<TrackedSubmission, ServiceError> {
		let id = submission_id(id)?;
		let current = self.tracker.get(&id)?;
		if matches!(current.status, SubmissionStatus::Pending { .. }) {
			return Ok(self.tracker.poll(&id).await?);
		}
		Ok(current)
	}

	/// Stops tracking a submission.
	pub fn cancel_submission(&self, id: &str) -> Result<TrackedSubmission, ServiceError> {
		Ok(self.tracker.cancel(&submission_id(id)?)?)
	}
}

fn address_param(input: &str) -> Result<Address, ServiceError> {
	Ok(parse_address(input).map_err(PayloadError::from)?)
}

fn submission_id(input: &str) -> Result<SubmissionId, ServiceError> {
	input
		.parse()
		.map_err(|_| ServiceError::InvalidRequest(format!("'{}' is not a submission id", input)))
}
