//! Configuration loading and merging
//!
//! The project's `pal.toml` is parsed into a sparse [`Config`](crate::domain::Config)
//! and merged over the built-in defaults; user values win whenever they are set.

pub mod loader;
pub mod merge;
pub mod size;

pub use loader::{config_path, load_config, to_toml};
pub use merge::{resolve_config, resolve_project_config};
pub use size::parse_size;
