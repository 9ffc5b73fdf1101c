//! Configuration module for metaprofile.
//!
//! Two layers: `ExtractionConfig` describes one extraction run (what table,
//! which thresholds and overrides), while `Settings` is the application-wide
//! TOML file carrying the metadata store location and audit identity.

mod extraction;
mod settings;

pub use extraction::ExtractionConfig;
pub use settings::{expand_env_vars, Settings, StoreConfig, StoreSettings};
