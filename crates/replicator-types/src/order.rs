//! Rebalancing order types.
//!
//! `OrderParameters` is the static input of the conditional order that the
//! external order manager evaluates at fill time. It is built fresh for
//! every request and consumed once to produce ABI bytes.

use crate::common::{Address, B256, I256, U256};
use serde::{Deserialize, Serialize};

/// Seconds a discrete order generated from the conditional order stays valid.
pub const ORDER_VALIDITY_SECS: u32 = 600;

/// Maximum tolerated age of an oracle price, in seconds.
pub const MAX_ORACLE_STALENESS_SECS: u64 = 3600;

/// Parameters of a portfolio-replicating conditional order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParameters {
	/// Tokens the order may sell, paired by position with `deltas`.
	pub sell_tokens: Vec<Address>,
	/// Signed allocation deltas in basis points, one per sell token.
	pub deltas: Vec<I256>,
	/// Address whose portfolio is replicated.
	pub target: Address,
	/// Application data hash attached to every generated order.
	pub app_data: B256,
	/// Receiver of the bought tokens.
	pub receiver: Address,
	/// Always false: generated orders are fill-or-kill.
	pub partially_fillable: bool,
	/// Validity of each generated order, in seconds.
	pub validity: u32,
	/// Oracle price feeds, paired by position with `sell_tokens`.
	pub price_feeds: Vec<Address>,
	/// Maximum tolerated oracle staleness, in seconds.
	pub max_oracle_staleness: U256,
}

impl OrderParameters {
	/// Creates parameters with the fixed validity, staleness and fill policy.
	pub fn new(
		sell_tokens: Vec<Address>,
		deltas: Vec<I256>,
		target: Address,
		app_data: B256,
		receiver: Address,
	) -> Self {
		Self {
			sell_tokens,
			deltas,
			target,
			app_data,
			receiver,
			partially_fillable: false,
			validity: ORDER_VALIDITY_SECS,
			price_feeds: Vec::new(),
			max_oracle_staleness: U256::from(MAX_ORACLE_STALENESS_SECS),
		}
	}
}
