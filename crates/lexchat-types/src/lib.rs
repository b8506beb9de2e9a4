//! Shared domain types for lexchat.
//!
//! This crate contains the types used across the proxy: chat messages and
//! their owners, LLM request/response shapes, agent profiles, configuration,
//! and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod llm;
