use crate::config::MeshConfig;
use crate::error::MeshResult;
use log::debug;
use std::fs;
use std::path::Path;

/// Load and validate a mesh config from a JSON file
pub fn load_config<P: AsRef<Path>>(file_path: P) -> MeshResult<MeshConfig> {
    let path = file_path.as_ref();
    let json_str = fs::read_to_string(path)?;
    debug!("loaded config {}", path.display());
    load_config_str(&json_str)
}

/// Load and validate a mesh config from a JSON string
pub fn load_config_str(json_str: &str) -> MeshResult<MeshConfig> {
    let config: MeshConfig = serde_json::from_str(json_str)?;
    config.validate()?;
    Ok(config)
}

/// Write a config as pretty JSON, e.g. to seed a new setup from a preset
pub fn save_config<P: AsRef<Path>>(config: &MeshConfig, file_path: P) -> MeshResult<()> {
    fs::write(file_path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}
