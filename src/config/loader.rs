//! Config file loading

use crate::domain::{Config, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the config file for a project.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Load the user's `pal.toml` from the project root.
///
/// The file must exist; every option in it is optional. Unset options are
/// left at their "not set" values for [`super::resolve_config`] to fill in.
pub fn load_config(project_root: &Path) -> Result<Config> {
    let path = config_path(project_root);

    let content = fs::read_to_string(&path).with_context(|| {
        format!("Failed to read config file {} (run `pal init` to create one)", path.display())
    })?;

    parse_toml_config(&content, &path)
}

fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    toml::from_str(content).with_context(|| format!("Invalid config file: {}", config_file.display()))
}

/// Serialize a config as TOML, omitting unset options.
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string(config).context("Failed to encode config as TOML")
}
