//! Static seed catalog.
//!
//! The demo ships a fixed set of example portfolios. Rows are returned in
//! seed order; the same address may appear more than once.

use crate::{CatalogError, CatalogInterface};
use async_trait::async_trait;
use replicator_types::{Address, Allocation, PortfolioListing};

/// Catalog backed by the compiled-in demo rows.
pub struct SeedCatalog {
	listings: Vec<PortfolioListing>,
	allocation: Vec<Allocation>,
}

impl SeedCatalog {
	pub fn new() -> Self {
		Self {
			listings: seed_listings(),
			allocation: vec![
				Allocation::new("ETH", 53),
				Allocation::new("DAI", 20),
				Allocation::new("CRV", 27),
			],
		}
	}
}

impl Default for SeedCatalog {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl CatalogInterface for SeedCatalog {
	async fn listings(&self) -> Result<Vec<PortfolioListing>, CatalogError> {
		Ok(self.listings.clone())
	}

	// Every target shows the same demo allocation.
	async fn allocation(&self, _address: &Address) -> Result<Vec<Allocation>, CatalogError> {
		Ok(self.allocation.clone())
	}
}

fn seed_listings() -> Vec<PortfolioListing> {
	vec![
		PortfolioListing::new(
			"✨",
			"0x538d72dEd42A76A30f730292Da939e0577f22F57",
			"$250.00",
			&["ETH", "DAI", "CRV"],
			"Senior portfolio manager @ private fund",
		),
		PortfolioListing::new(
			"👋",
			"0x48EC5560bFD59b95859965cCE48cC244CFDF6b0c",
			"$150.00",
			&["WBTC", "DOGE", "LINK"],
			"Crypto OG since 2013",
		),
		PortfolioListing::new(
			"📣",
			"0xA2aFbEdF7E5c8bf94ee7a4f7912359104c186881",
			"$350.00",
			&["ETH", "GEAR", "CRV"],
			"Got lucky last bull run, looking to repeat",
		),
		PortfolioListing::new(
			"❌",
			"0x9D3de545F58C696946b4Cf2c884fcF4f7914cB53",
			"$450.00",
			&["GHO", "SHIB", "PEPE"],
			"Unhinged degenerate, don't follow me",
		),
		PortfolioListing::new(
			"❌",
			"0x5f9579E5Ea193D4FbdF73C19dbc71EbBD003741a",
			"$550.00",
			&["MARIO", "LUIGI", "PEACH"],
			"I'm a me, Mario!",
		),
		PortfolioListing::new(
			"📣",
			"0x1f9090aaE28b8a3dCeaDf281B0F12828e676c326",
			"$200.00",
			&["ETH", "WBTC"],
			"Boomer investor, looking for a safe bet",
		),
		PortfolioListing::new(
			"📣",
			"0x9D3de545F58C696946b4Cf2c884fcF4f7914cB53",
			"$300.00",
			&["FILE", "CRV", "AAVE"],
			"The modern curious tech investor",
		),
	]
}
