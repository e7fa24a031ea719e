//! Output rendering (context string sent to the model)

pub mod context;

pub use context::{assemble_context, check_context_length, full_system_message};
