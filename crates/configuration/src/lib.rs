use crate::error::ConfigError;
use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, Costs, IndexConfig, OutputConfig, PriceModel, Simulation, SupplyEntry,
    YieldModelConfig,
};

/// Loads and validates the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, checks its invariants, and returns it. The result is built once
/// at startup and passed by reference into every component that needs it.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for the configuration file at `path`.
        .add_source(config::File::with_name(path))
        // Optionally, one could add environment variables here as well.
        // .add_source(config::Environment::with_prefix("APP"));
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    debug!("Loaded configuration from {}", path);

    Ok(config)
}
