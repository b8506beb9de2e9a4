//! Infrastructure layer for lexchat.
//!
//! Implements the ports defined in `lexchat-core`: SQLite conversation
//! storage, API key issuing/verification, the OpenAI-compatible completion
//! endpoint, and configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
