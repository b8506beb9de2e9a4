//! HTTP/REST API layer for lexchat.
//!
//! Axum-based API under `/api/` with API key authentication and
//! `{"error": ...}` failure bodies.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
