//! Application state wiring the services together.
//!
//! AppState pins the generic [`ChatService`] to the SQLite history store and
//! holds everything a request handler needs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use lexchat_core::chat::service::ChatService;
use lexchat_core::llm::box_provider::BoxLlmProvider;
use lexchat_core::llm::dispatcher::CompletionDispatcher;
use lexchat_infra::config::RuntimeConfig;
use lexchat_infra::llm::create_provider;
use lexchat_infra::sqlite::api_key::SqliteApiKeyStore;
use lexchat_infra::sqlite::history::SqliteHistoryStore;
use lexchat_infra::sqlite::pool::DatabasePool;
use lexchat_types::config::GlobalConfig;

pub type ConcreteChatService = ChatService<SqliteHistoryStore>;

/// Shared application state for the REST API.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub api_keys: SqliteApiKeyStore,
    pub data_dir: PathBuf,
}

/// Create the data directory if needed and open (and migrate) the database.
pub async fn open_database(data_dir: &Path) -> anyhow::Result<DatabasePool> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    DatabasePool::open_in(data_dir)
        .await
        .with_context(|| format!("Failed to open database in {}", data_dir.display()))
}

impl AppState {
    /// Open the database and connect the configured completion endpoint.
    pub async fn init(data_dir: PathBuf, runtime: RuntimeConfig) -> anyhow::Result<Self> {
        let db_pool = open_database(&data_dir).await?;

        let provider = create_provider(&runtime.global.endpoint, runtime.api_key).with_context(
            || {
                format!(
                    "No credential for {}; set LEXCHAT_API_KEY",
                    runtime.global.endpoint.base_url
                )
            },
        )?;

        Self::with_provider(data_dir, db_pool, provider, &runtime.global)
    }

    /// Wire the services around an already-built provider.
    pub fn with_provider(
        data_dir: PathBuf,
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
        config: &GlobalConfig,
    ) -> anyhow::Result<Self> {
        let history = Arc::new(SqliteHistoryStore::new(db_pool.clone()));
        let dispatcher = CompletionDispatcher::new(Arc::new(provider));
        let chat_service = ChatService::new(
            history,
            dispatcher,
            &config.chat,
            config.generation.clone(),
        )
        .context("Failed to build chat service")?;

        Ok(Self {
            chat_service: Arc::new(chat_service),
            api_keys: SqliteApiKeyStore::new(db_pool),
            data_dir,
        })
    }
}
