//! Shared domain types for the portfolio replicator.
//!
//! Every other crate in the workspace builds on these definitions: the
//! Safe transaction-builder batch format, the rebalancing order parameters,
//! the portfolio listing rows and the submission tracking states.

pub mod api;
pub mod batch;
pub mod chains;
pub mod common;
pub mod delivery;
pub mod errors;
pub mod order;
pub mod portfolio;

pub use api::*;
pub use batch::*;
pub use chains::*;
pub use common::*;
pub use delivery::*;
pub use errors::*;
pub use order::*;
pub use portfolio::*;
