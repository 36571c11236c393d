//! Configuration for the portfolio replicator.
//!
//! Configuration is read from TOML, JSON or YAML files, overridden from the
//! environment and validated before use. `ReplicatorConfig::default()` is
//! the Goerli demo deployment.

mod loader;
mod serde_helpers;
mod types;

pub use loader::{load_config, ConfigLoader};
pub use types::*;
