//! Analyze command implementation

use anyhow::Result;
use std::path::Path;

use super::utils::collect_project;
use crate::render::assemble_context;
use crate::utils::format_with_commas;

const LARGEST_SHOWN: usize = 15;

/// Report what would be sent to the model, to help estimate token usage.
pub fn run(project_path: &Path) -> Result<()> {
    let project = collect_project(project_path)?;
    let context = assemble_context(&project.documents);
    let context_chars = context.chars().count() as u64;
    let stats = &project.stats;

    println!("Number of documents that would be included in the context:");
    println!("  {}\n", format_with_commas(project.documents.len() as u64));

    println!("Full context string length:");
    println!(
        "  {} characters (limit {})\n",
        format_with_commas(context_chars),
        format_with_commas(project.config.max_context_length as u64)
    );

    println!("Statistics:");
    println!("  Entries visited: {}", stats.entries_visited);
    println!("  Files skipped (ignore rules): {}", stats.files_skipped_pattern);
    println!("  Files skipped (size): {}", stats.files_skipped_size);
    println!("  Files skipped (not text): {}", stats.files_skipped_encoding);
    println!("  Directories pruned: {}", stats.dirs_pruned);
    println!("  Rule files loaded: {}", stats.rule_files_loaded);
    println!("  Total bytes: {}\n", format_with_commas(stats.bytes_included));

    let mut largest: Vec<_> = project.documents.iter().collect();
    largest.sort_by(|a, b| b.content.len().cmp(&a.content.len()).then_with(|| a.path.cmp(&b.path)));

    println!("Fifteen largest documents:");
    for doc in largest.iter().take(LARGEST_SHOWN) {
        println!("  {}", doc.path);
    }

    Ok(())
}
