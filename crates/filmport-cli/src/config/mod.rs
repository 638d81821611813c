//! Application configuration module.
//!
//! Manages the TOML config file holding the OMDb API key and the
//! default search parameters.

#[allow(clippy::module_inception)]
mod config;
mod paths;
mod validate;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, OmdbConfig, SearchConfig};
pub use paths::resolve_config_path;
pub use validate::{mask_api_key, validate_api_key, validate_term, validate_year};
