//! SQLite storage: split reader/writer pool, conversation history, API keys.

pub mod api_key;
pub mod history;
pub mod pool;
