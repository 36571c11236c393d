//! Main service implementation for the portfolio replicator.
//!
//! This crate wires configuration, payload construction, the portfolio
//! catalog and transaction delivery into one service, and exposes it over
//! HTTP and the `portfolio-replicator` command line.
//!
//! # Components
//!
//! - `api`: HTTP routes and error mapping
//! - `service`: the request-level operations shared by API and CLI
//! - `session`: per-owner record of the Safe created for them

pub mod api;
pub mod service;
pub mod session;

pub use service::{ReplicatorService, ServiceError};
pub use session::SessionContext;
