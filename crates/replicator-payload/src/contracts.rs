//! Solidity bindings for the contracts the replicator calls into.

use alloy::sol;

sol! {
	/// Safe fallback manager.
	interface ISafe {
		function setFallbackHandler(address handler) external;
	}

	/// Domain verifier registry of the extensible fallback handler.
	interface ISignatureVerifierMuxer {
		function setDomainVerifier(bytes32 domainSeparator, address newVerifier) external;
	}

	interface IERC20 {
		function approve(address spender, uint256 value) external returns (bool);
	}

	/// Parameters identifying a conditional order.
	struct ConditionalOrderParams {
		address handler;
		bytes32 salt;
		bytes staticInput;
	}

	/// Conditional order manager.
	interface IComposableCow {
		function create(ConditionalOrderParams params, bool dispatch) external;
	}

	/// Static input of the portfolio replication order.
	struct ReplicationOrderData {
		address[] sellTokens;
		int256[] deltas;
		address target;
		bytes32 appData;
		address receiver;
		bool partiallyFillable;
		uint32 validity;
		address[] priceFeeds;
		uint256 maxTimeSinceLastOracleUpdate;
	}
}
