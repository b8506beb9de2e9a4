//! Business logic and port definitions for lexchat.
//!
//! This crate defines the "ports" (`LlmProvider`, `HistoryStore`) that the
//! infrastructure layer implements, plus the pure pieces of the chat
//! pipeline: agent selection, context assembly, completion dispatch and
//! response sanitizing. It depends only on `lexchat-types` -- never on
//! `lexchat-infra` or any database/HTTP crate.

pub mod agent;
pub mod chat;
pub mod llm;
pub mod sanitize;
