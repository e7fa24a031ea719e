//! Merge user overrides over defaults and validate the result

use super::loader::load_config;
use super::size::parse_size;
use crate::domain::{Config, ProviderKind};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Apply every set value in `overrides` on top of [`Config::default`] and
/// validate the result.
///
/// `exclude` replaces the defaults whenever it is present, even when empty.
/// `max-context-length` counts only when positive and
/// `max-conversation-history` only when non-zero.
pub fn resolve_config(overrides: &Config) -> Result<Config> {
    let mut conf = Config::default();

    if !overrides.system_message.is_empty() {
        conf.system_message = overrides.system_message.clone();
    }
    if let Some(exclude) = &overrides.exclude {
        conf.exclude = Some(exclude.clone());
    }
    if !overrides.provider.is_empty() {
        conf.provider = overrides.provider.clone();
    }
    if overrides.max_context_length > 0 {
        conf.max_context_length = overrides.max_context_length;
    }
    if !overrides.max_file_size.is_empty() {
        conf.max_file_size = overrides.max_file_size.clone();
    }
    if !overrides.openai.api_key_env.is_empty() {
        conf.openai.api_key_env = overrides.openai.api_key_env.clone();
    }
    if !overrides.openai.model.is_empty() {
        conf.openai.model = overrides.openai.model.clone();
    }
    if !overrides.anthropic.api_key_env.is_empty() {
        conf.anthropic.api_key_env = overrides.anthropic.api_key_env.clone();
    }
    if !overrides.anthropic.model.is_empty() {
        conf.anthropic.model = overrides.anthropic.model.clone();
    }
    if overrides.max_conversation_history != 0 {
        conf.max_conversation_history = overrides.max_conversation_history;
    }

    validate(&conf).context("The config is invalid.")?;
    Ok(conf)
}

/// Load `pal.toml` from the project and resolve it.
pub fn resolve_project_config(project_root: &Path) -> Result<Config> {
    let user = load_config(project_root)?;
    resolve_config(&user)
}

/// Report every problem at once rather than stopping at the first.
fn validate(conf: &Config) -> Result<()> {
    let mut problems = Vec::new();

    if ProviderKind::parse(&conf.provider).is_none() {
        problems.push(format!(
            "{:?} is not a supported value for \"provider\" (expected one of: {}).",
            conf.provider,
            ProviderKind::SUPPORTED.join(", ")
        ));
    }
    if conf.system_message.trim().is_empty() {
        problems.push("Missing \"system-message\" configuration value.".to_string());
    }
    if parse_size(&conf.max_file_size).is_err() {
        problems.push(format!(
            "Incorrect string representation of bytes for \"max-file-size\": {:?}.",
            conf.max_file_size
        ));
    }

    if !problems.is_empty() {
        bail!(problems.join("\n"));
    }
    Ok(())
}
