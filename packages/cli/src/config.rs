//! Corridor configuration loading.
//!
//! Settings come from an optional TOML file; anything it leaves out falls
//! back to the [`CorridorConfig`] defaults. Command-line flags override
//! both.

use std::path::Path;

use ride_route_traffic_models::CorridorConfig;

use crate::CliError;

/// Loads the corridor configuration, or the defaults when no file is given.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or is not valid TOML.
pub fn load_config(path: Option<&Path>) -> Result<CorridorConfig, CliError> {
    let Some(path) = path else {
        return Ok(CorridorConfig::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::debug!("Loaded corridor config from {}: {config:?}", path.display());
    Ok(config)
}

/// Parses a corridor configuration from TOML.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the TOML is malformed or a value has the
/// wrong type.
pub fn parse_config(toml_str: &str) -> Result<CorridorConfig, CliError> {
    let config: CorridorConfig = toml::from_str(toml_str)?;

    for (name, value) in [
        ("hazard_corridor_miles", config.hazard_corridor_miles),
        ("rider_corridor_miles", config.rider_corridor_miles),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CliError::InvalidCorridor { name, value });
        }
    }

    Ok(config)
}
