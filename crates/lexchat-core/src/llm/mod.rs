//! LLM provider abstractions for lexchat.
//!
//! - `LlmProvider`: RPITIT trait for concrete endpoint implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `CompletionDispatcher`: buffered or streaming dispatch of an assembled prompt

pub mod box_provider;
pub mod dispatcher;
pub mod provider;
