//! Owner sessions.
//!
//! The account-creation flow reports the Safe it deployed for an owner;
//! later requests from that owner read it back to route bought tokens to
//! the Safe. Absence is normal until the Safe has been created.

use dashmap::DashMap;
use replicator_types::Address;
use tracing::info;

/// Owner address → created Safe address.
#[derive(Debug, Default)]
pub struct SessionContext {
	safes: DashMap<Address, Address>,
}

impl SessionContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `safe` for `owner`, returning the Safe it replaces.
	pub fn record_safe(&self, owner: Address, safe: Address) -> Option<Address> {
		let previous = self.safes.insert(owner, safe);
		info!(owner = %owner, safe = %safe, replaced = previous.is_some(), "recorded safe");
		previous
	}

	pub fn safe_of(&self, owner: &Address) -> Option<Address> {
		self.safes.get(owner).map(|entry| *entry.value())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_record_and_replace() {
		let sessions = SessionContext::new();
		let owner = Address::repeat_byte(0x01);

		assert_eq!(sessions.safe_of(&owner), None);
		assert_eq!(sessions.record_safe(owner, Address::repeat_byte(0x02)), None);
		assert_eq!(
			sessions.record_safe(owner, Address::repeat_byte(0x03)),
			Some(Address::repeat_byte(0x02))
		);
		assert_eq!(sessions.safe_of(&owner), Some(Address::repeat_byte(0x03)));
	}

	#[test]
	fn test_owners_are_independent() {
		let sessions = SessionContext::new();
		sessions.record_safe(Address::repeat_byte(0x01), Address::repeat_byte(0x0a));
		assert_eq!(sessions.safe_of(&Address::repeat_byte(0x02)), None);
	}
}
