//! Config command implementation

use anyhow::Result;
use std::path::Path;

use crate::config::{resolve_project_config, to_toml};

/// Print the resolved configuration (defaults plus the user's overrides).
pub fn run(project_path: &Path) -> Result<()> {
    let config = resolve_project_config(project_path)?;
    println!("{}", to_toml(&config)?);
    Ok(())
}
