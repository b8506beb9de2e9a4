//! Conversation persistence port and the chat relay service.
//!
//! `HistoryStore` is implemented by the infrastructure layer; `ChatService`
//! runs one chat turn end to end on top of it.

pub mod repository;
pub mod service;
