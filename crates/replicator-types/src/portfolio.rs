//! Portfolio listing types.

use serde::{Deserialize, Serialize};

/// One row of the portfolio listing.
///
/// The address is kept exactly as seeded; it is only a navigation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioListing {
	pub icon: String,
	pub address: String,
	pub total_amount: String,
	pub top_assets: Vec<String>,
	pub description: String,
}

impl PortfolioListing {
	pub fn new(
		icon: impl Into<String>,
		address: impl Into<String>,
		total_amount: impl Into<String>,
		top_assets: &[&str],
		description: impl Into<String>,
	) -> Self {
		Self {
			icon: icon.into(),
			address: address.into(),
			total_amount: total_amount.into(),
			top_assets: top_assets.iter().map(|s| s.to_string()).collect(),
			description: description.into(),
		}
	}

	/// Path of the invest view for this listing.
	pub fn invest_path(&self) -> String {
		format!("/invest/{}", self.address)
	}
}

/// Share of a portfolio held in one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
	pub symbol: String,
	/// Share in whole percent.
	pub percent: u8,
}

impl Allocation {
	pub fn new(symbol: impl Into<String>, percent: u8) -> Self {
		Self {
			symbol: symbol.into(),
			percent,
		}
	}
}
