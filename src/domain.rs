//! Core data types shared across modules

use serde::{Deserialize, Serialize};

/// Name of the CLI app and the command that invokes it.
pub const APP_NAME: &str = "pal";

/// Private state directory inside a project (database lives here).
pub const APP_DIR: &str = ".pal";

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "pal.toml";

/// Per-directory ignore rule file.
pub const RULE_FILE_NAME: &str = ".gitignore";

/// A text file from the project directory that is sent to the model as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the project root, always `/`-separated.
    pub path: String,
    pub content: String,
}

/// Counters collected while scanning a project.
///
/// Skips are expected filtering outcomes; the counters only describe them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub entries_visited: usize,
    pub files_included: usize,
    pub files_skipped_pattern: usize,
    pub files_skipped_size: usize,
    pub files_skipped_encoding: usize,
    pub dirs_pruned: usize,
    pub rule_files_loaded: usize,
    pub bytes_included: u64,
}

impl ScanStats {
    pub fn files_skipped(&self) -> usize {
        self.files_skipped_pattern + self.files_skipped_size + self.files_skipped_encoding
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One turn of a conversation as sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Openai,
    Anthropic,
    Testing,
}

impl ProviderKind {
    pub const SUPPORTED: &'static [&'static str] = &["openai", "anthropic", "testing"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openai" => Some(Self::Openai),
            "anthropic" => Some(Self::Anthropic),
            "testing" => Some(Self::Testing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Testing => "testing",
        }
    }
}

/// Provider credentials and model selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key_env: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
}

impl ProviderSettings {
    pub fn is_empty(&self) -> bool {
        self.api_key_env.is_empty() && self.model.is_empty()
    }
}

/// Options read from `pal.toml`.
///
/// Every field is optional in the file; unset values are filled from
/// [`Config::default`] by [`crate::config::resolve_config`]. Sentinel values
/// (`""`, `0`) mean "not set", matching how the file is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "Config::empty", rename_all = "kebab-case")]
pub struct Config {
    /// `openai`, `anthropic` or `testing`. Validated on resolution.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,

    /// Sent with every request, followed by the context string.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub system_message: String,

    /// Additional gitignore patterns excluded from the context.
    pub exclude: Option<Vec<String>>,

    /// Maximum length of the full context string, in characters.
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub max_context_length: usize,

    /// Files above this size are ignored, e.g. `20KB`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub max_file_size: String,

    /// Conversations beyond this count are pruned; `-1` disables pruning.
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub max_conversation_history: i64,

    #[serde(skip_serializing_if = "ProviderSettings::is_empty")]
    pub openai: ProviderSettings,

    #[serde(skip_serializing_if = "ProviderSettings::is_empty")]
    pub anthropic: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Openai.as_str().to_string(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            exclude: Some(vec![CONFIG_FILE_NAME.to_string()]),
            max_context_length: 100_000,
            max_file_size: "20KB".to_string(),
            max_conversation_history: 100,
            openai: ProviderSettings {
                api_key_env: "OPENAI_API_KEY".to_string(),
                model: "gpt-4o-mini".to_string(),
            },
            anthropic: ProviderSettings {
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                model: "claude-3-5-haiku-latest".to_string(),
            },
        }
    }
}

impl Config {
    /// An all-unset config, the starting point for a parsed user file.
    pub fn empty() -> Self {
        Self {
            provider: String::new(),
            system_message: String::new(),
            exclude: None,
            max_context_length: 0,
            max_file_size: String::new(),
            max_conversation_history: 0,
            openai: ProviderSettings::default(),
            anthropic: ProviderSettings::default(),
        }
    }

    /// Extra exclude patterns, empty when none are configured.
    pub fn exclude_patterns(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or(&[])
    }
}

fn is_zero_usize(value: &usize) -> bool {
    *value == 0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

pub const DEFAULT_SYSTEM_MESSAGE: &str = "\
You are an assistant helping a developer understand and work on their software project.
The contents of the project's text files are provided below, each wrapped in a <document>
element with its relative path in <source> and its full text in <document_content>.
Base your answers on these documents. Refer to files by their relative paths. When the
documents do not contain enough information to answer, say so instead of guessing.";
