//! Library entry for structlist-cli used by integration tests and embedding.

pub mod commands;
pub mod field;
pub mod script;

// Re-export commands for convenience
pub use commands::*;

// Re-export commonly used items
pub use field::{ElementKind, FieldSpec};
pub use script::{Script, Step};
