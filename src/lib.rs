//! pal: talk to an LLM about a project's source code and documentation
//!
//! The project's text files are collected into a single context string,
//! honoring `.gitignore` rules at every level of the tree, and sent along
//! with each message. Conversations are kept in a local SQLite database.

pub mod cli;
pub mod config;
pub mod domain;
pub mod provider;
pub mod render;
pub mod scan;
pub mod store;
pub mod utils;

pub use domain::{Config, Document, ScanStats};
pub use scan::{load_documents, DocumentScanner, ScanError};
