//! Shared CLI utilities.

use crate::config::{parse_size, resolve_project_config};
use crate::domain::{Config, Document, ScanStats};
use crate::scan::DocumentScanner;
use anyhow::{bail, Context, Result};
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Everything a command needs to know about the project's context.
pub struct ProjectContext {
    pub config: Config,
    pub documents: Vec<Document>,
    pub stats: ScanStats,
}

/// Resolve the project's config and scan its documents.
pub fn collect_project(project_path: &Path) -> Result<ProjectContext> {
    let config = load_project_config(project_path)?;
    scan_project(project_path, config)
}

/// Resolve the project's config without touching any other file.
pub fn load_project_config(project_path: &Path) -> Result<Config> {
    if project_path.as_os_str().is_empty() {
        bail!("The project path may not be empty.");
    }
    resolve_project_config(project_path)
}

/// Scan the project with an already resolved config.
pub fn scan_project(project_path: &Path, config: Config) -> Result<ProjectContext> {
    let max_file_bytes = parse_size(&config.max_file_size).context("The config is invalid.")?;

    let mut scanner = DocumentScanner::new(project_path.to_path_buf())
        .exclude_patterns(config.exclude_patterns().to_vec())
        .max_file_bytes(max_file_bytes);
    let documents = scanner.scan()?;
    let stats = scanner.stats().clone();

    Ok(ProjectContext { config, documents, stats })
}

/// Read all of stdin when something is piped in; empty for a terminal.
pub fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer).context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Join the piped text and the argument, in that order, with a blank line.
pub fn combine_message(stdin_text: &str, argument: Option<&str>) -> Result<String> {
    let parts: Vec<&str> =
        [Some(stdin_text), argument].into_iter().flatten().filter(|part| !part.is_empty()).collect();

    if parts.is_empty() {
        bail!("The message cannot be empty.");
    }
    Ok(parts.join("\n\n"))
}
