//! Context string assembly.
//!
//! Documents are wrapped in XML-style tags so the model can tell where each
//! file starts and ends and which path it came from.

use crate::domain::Document;
use anyhow::{bail, Result};

/// Concatenate documents into a single delimited block.
pub fn assemble_context(documents: &[Document]) -> String {
    let body_len: usize = documents.iter().map(|d| d.path.len() + d.content.len() + 96).sum();
    let mut output = String::with_capacity(body_len + 24);

    output.push_str("<documents>\n");
    for doc in documents {
        output.push_str("<document>\n");
        output.push_str(&format!("<source>{}</source>\n", doc.path));
        output.push_str("<document_content>\n");
        output.push_str(&doc.content);
        output.push_str("</document_content>\n");
        output.push_str("</document>\n");
    }
    output.push_str("</documents>");

    output
}

/// Reject a context longer than `max_length` characters.
pub fn check_context_length(context: &str, max_length: usize) -> Result<()> {
    let length = context.chars().count();
    if length > max_length {
        bail!(
            "Context length ({}) exceeds the maximum permitted context ({}), configurable by \
             setting the \"max-context-length\" configuration setting (counted in characters).",
            length,
            max_length
        );
    }
    Ok(())
}

/// System message followed by the context block.
pub fn full_system_message(system_message: &str, context: &str) -> String {
    format!("{}\n\n{}", system_message, context)
}
