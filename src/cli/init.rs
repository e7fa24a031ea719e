//! Init command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::config::{config_path, to_toml};
use crate::domain::{Config, APP_DIR, APP_NAME, RULE_FILE_NAME};

#[derive(Args)]
pub struct InitArgs {
    /// Provider to configure
    #[arg(value_name = "PROVIDER", value_parser = ["openai", "anthropic"], default_value = "openai")]
    pub provider: String,
}

/// Minimal config written by `init`: everything a user is likely to tune,
/// nothing that merely repeats a built-in default message.
pub fn initial_config(provider: &str) -> Config {
    let defaults = Config::default();
    Config {
        provider: provider.to_string(),
        exclude: defaults.exclude,
        max_file_size: defaults.max_file_size,
        max_context_length: defaults.max_context_length,
        openai: defaults.openai,
        anthropic: defaults.anthropic,
        ..Config::empty()
    }
}

pub fn run(project_path: &Path, args: InitArgs) -> Result<()> {
    if project_path.as_os_str().is_empty() {
        anyhow::bail!("Failed to initialize project. Missing project path.");
    }

    let path = config_path(project_path);
    let content = to_toml(&initial_config(&args.provider))?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            anyhow::bail!(
                "Failed to initialize config file. The path already exists: {}",
                path.display()
            );
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to create config file {}", path.display()));
        }
    };
    file.write_all(content.as_bytes()).context("Failed to write to config file")?;

    println!("Initialization successful! Please review the generated config file:");
    println!("  {}\n", path.display());

    let rule_file = project_path.join(RULE_FILE_NAME);
    if rule_file.is_file() {
        println!("Consider adding {} to your {} file:", APP_DIR, RULE_FILE_NAME);
        println!("  echo \"{}\" >> {}\n", APP_DIR, rule_file.display());
    }

    println!("Please run the following command to analyze your expected token usage:");
    println!("  {} --path {} analyze", APP_NAME, project_path.display());

    Ok(())
}
