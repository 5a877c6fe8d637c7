//! Configuration for reelsort.
//!
//! Settings merge in priority order: built-in defaults, then the optional
//! TOML file, then CLI overrides, then the SQLite settings store (the
//! control surface writes there, so it wins). The store also persists
//! per-file size history for the completeness gate.

pub mod error;
pub mod loader;
pub mod models;
pub mod store;
pub mod validation;

pub use error::ConfigError;
pub use loader::{CliOverrides, load_config};
pub use models::Config;
pub use store::{SettingsStore, keys};
pub use validation::validate;
