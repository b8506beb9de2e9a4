//! Agent routing and prompt context assembly.

pub mod context;
pub mod prompt;
pub mod selector;
