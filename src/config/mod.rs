pub mod types;

use std::path::Path;

use crate::error::{PortalError, Result};
use types::{Config, MapConfig};

/// Highest zoom level served by standard slippy-map tile servers.
const MAX_ZOOM: u8 = 19;

/// Read `config.yaml`. A missing file is not an error: every section falls
/// back to its defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PortalError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_yml::from_str::<Config>(&content)?
    } else {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        Config::default()
    };
    check_map(&config.map)?;
    Ok(config)
}

fn check_map(map: &MapConfig) -> Result<()> {
    for (name, zoom) in [
        ("initial_zoom", map.initial_zoom),
        ("property_zoom", map.property_zoom),
        ("complex_zoom", map.complex_zoom),
    ] {
        if zoom > MAX_ZOOM {
            return Err(PortalError::Config(format!(
                "map.{name} is {zoom}, maximum is {MAX_ZOOM}"
            )));
        }
    }
    if !map.initial_center.is_valid() {
        return Err(PortalError::Config(
            "map.initial_center is not a valid coordinate".into(),
        ));
    }
    Ok(())
}
