//! Portfolio catalog for the replicator.
//!
//! This module provides the listing of example portfolios a user can
//! replicate and the detail shown for a single target address. Catalog
//! backends implement [`CatalogInterface`]; the shipped backend is a static
//! seed compiled into the binary.

use async_trait::async_trait;
use replicator_types::{
	parse_address, Address, Allocation, Bytes, InvestView, PortfolioListing, PortfolioRow,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod seed;
}

/// Product text shown alongside every invest view.
pub const REPLICATION_EXPLANATION: &str = "By investing in this portfolio, your ETH will be \
swapped into the current portfolio allocations of the target address. Whenever the target \
address performs a trade and the allocations change, your portfolio will be automatically \
rebalanced to match the new allocations. Under the hood, this uses a CoW Protocol \
Programmatic Order which can be triggered whenever the allocations change by more than the \
configured threshold (default: 5%).";

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// Error that occurs when the catalog backend fails.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the interface for catalog backends.
#[async_trait]
pub trait CatalogInterface: Send + Sync {
	/// Returns every listing, in display order.
	async fn listings(&self) -> Result<Vec<PortfolioListing>, CatalogError>;

	/// Returns the target allocation of `address`.
	async fn allocation(&self, address: &Address) -> Result<Vec<Allocation>, CatalogError>;
}

/// High-level catalog service used by the API.
pub struct CatalogService {
	/// The underlying catalog backend implementation.
	backend: Box<dyn CatalogInterface>,
}

impl CatalogService {
	/// Creates a new CatalogService with the specified backend.
	pub fn new(backend: Box<dyn CatalogInterface>) -> Self {
		Self { backend }
	}

	/// Listing rows with their invest-view links.
	pub async fn rows(&self) -> Result<Vec<PortfolioRow>, CatalogError> {
		Ok(self
			.backend
			.listings()
			.await?
			.into_iter()
			.map(|listing| PortfolioRow {
				link: listing.invest_path(),
				listing,
			})
			.collect())
	}

	/// Listings whose address equals `address`, ignoring letter case.
	pub async fn find(&self, address: &Address) -> Result<Vec<PortfolioListing>, CatalogError> {
		Ok(self
			.backend
			.listings()
			.await?
			.into_iter()
			.filter(|listing| parse_address(&listing.address).ok().as_ref() == Some(address))
			.collect())
	}

	/// Detail view for `address`, carrying its encoded order.
	///
	/// Addresses outside the catalog still get a view; only `listings` is
	/// empty for them.
	pub async fn invest_view(
		&self,
		address: Address,
		encoded_order: Bytes,
	) -> Result<InvestView, CatalogError> {
		Ok(InvestView {
			address,
			allocation: self.backend.allocation(&address).await?,
			listings: self.find(&address).await?,
			explanation: REPLICATION_EXPLANATION.to_string(),
			encoded_order,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::seed::SeedCatalog;

	fn service() -> CatalogService {
		CatalogService::new(Box::new(SeedCatalog::new()))
	}

	#[tokio::test]
	async fn test_rows_link_to_invest_view() {
		let rows = service().rows().await.unwrap();
		assert_eq!(rows.len(), 7);
		for row in &rows {
			assert_eq!(row.link, format!("/invest/{}", row.listing.address));
		}
		assert_eq!(
			rows[0].link,
			"/invest/0x538d72dEd42A76A30f730292Da939e0577f22F57"
		);
	}

	#[tokio::test]
	async fn test_find_matches_duplicate_rows() {
		let address = parse_address("0x9d3de545f58c696946b4cf2c884fcf4f7914cb53").unwrap();
		let found = service().find(&address).await.unwrap();
		assert_eq!(found.len(), 2);
		assert_eq!(found[0].top_assets, vec!["GHO", "SHIB", "PEPE"]);
		assert_eq!(found[1].top_assets, vec!["FILE", "CRV", "AAVE"]);
	}

	#[tokio::test]
	async fn test_invest_view_for_unlisted_address() {
		let view = service()
			.invest_view(Address::repeat_byte(0x77), Bytes::from(vec![0x01]))
			.await
			.unwrap();
		assert!(view.listings.is_empty());
		assert_eq!(view.allocation.len(), 3);
		assert!(view.explanation.contains("5%"));
		assert_eq!(view.encoded_order, Bytes::from(vec![0x01]));
	}

	#[tokio::test]
	async fn test_invest_view_serializes_camel_case() {
		let address = parse_address("0x1f9090aaE28b8a3dCeaDf281B0F12828e676c326").unwrap();
		let view = service().invest_view(address, Bytes::new()).await.unwrap();
		let json = serde_json::to_value(&view).unwrap();
		assert!(json.get("encodedOrder").is_some());
		assert_eq!(json["listings"][0]["totalAmount"], "$200.00");
		assert_eq!(json["allocation"][0]["symbol"], "ETH");
	}
}
