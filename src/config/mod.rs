//! Configuration module
//!
//! Light timing configuration: schema, validation and YAML loading.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, read_config};
pub use schema::LightConfig;
