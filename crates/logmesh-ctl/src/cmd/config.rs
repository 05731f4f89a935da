//! Config file management.

use anyhow::{Context, Result};

use logmesh_core::config::LogmeshConfig;

pub fn cmd_config_init() -> Result<()> {
    let path = LogmeshConfig::write_default_if_missing().context("failed to write config")?;
    println!("Config at {}", path.display());
    Ok(())
}
