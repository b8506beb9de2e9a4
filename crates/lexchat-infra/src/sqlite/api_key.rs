//! API key issuing and verification.
//!
//! Plaintext keys are shown once at creation; only their SHA-256 hash is
//! stored. Each key acts on behalf of exactly one owner.

use aes_gcm::aead::{OsRng, rand_core::RngCore};
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use lexchat_types::error::RepositoryError;
use lexchat_types::identity::OwnerId;

use super::pool::DatabasePool;

/// Prefix on every issued key, to make leaked keys recognizable.
pub const KEY_PREFIX: &str = "lexc_";

/// A freshly issued key. `plaintext` is never stored.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub plaintext: String,
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{digest:x}")
}

fn generate_key() -> String {
    let mut key_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut key_bytes);
    format!(
        "{KEY_PREFIX}{}",
        key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    )
}

#[derive(Clone)]
pub struct SqliteApiKeyStore {
    pool: DatabasePool,
}

impl SqliteApiKeyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Generate a key for `owner` and store its hash.
    pub async fn issue(&self, owner: OwnerId, name: &str) -> Result<IssuedKey, RepositoryError> {
        let plaintext = generate_key();
        let id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO api_keys (id, key_hash, owner_id, name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(hash_api_key(&plaintext))
        .bind(owner.to_string())
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(IssuedKey {
            id,
            owner_id: owner,
            name: name.to_string(),
            plaintext,
        })
    }

    /// Whether any key has been issued yet.
    pub async fn any_issued(&self) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM api_keys")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count > 0)
    }

    /// Resolve a presented key to its owner, or `None` if unknown.
    ///
    /// Touches `last_used_at` on success; failing to do so does not fail
    /// the lookup.
    pub async fn verify(&self, plaintext: &str) -> Result<Option<OwnerId>, RepositoryError> {
        let row = sqlx::query("SELECT id, owner_id FROM api_keys WHERE key_hash = ?")
            .bind(hash_api_key(plaintext))
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let owner_raw: String = row
            .try_get("owner_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let owner: OwnerId = owner_raw
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid owner_id: {e}")))?;

        if let Err(e) = sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(&id)
            .execute(&self.pool.writer)
            .await
        {
            debug!(key_id = %id, error = %e, "Failed to record API key use");
        }

        Ok(Some(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (SqliteApiKeyStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        (SqliteApiKeyStore::new(pool), dir)
    }

    #[test]
    fn test_hash_api_key_is_sha256_hex() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generated_key_shape() {
        let key = generate_key();
        assert!(key.starts_with(KEY_PREFIX));
        assert_eq!(key.len(), KEY_PREFIX.len() + 64);
        assert_ne!(generate_key(), key);
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (store, _dir) = test_store().await;
        let owner = OwnerId::new();

        let issued = store.issue(owner, "laptop").await.unwrap();
        assert_eq!(issued.owner_id, owner);
        assert_eq!(issued.name, "laptop");

        let resolved = store.verify(&issued.plaintext).await.unwrap();
        assert_eq!(resolved, Some(owner));
    }

    #[tokio::test]
    async fn test_any_issued() {
        let (store, _dir) = test_store().await;
        assert!(!store.any_issued().await.unwrap());
        store.issue(OwnerId::new(), "default").await.unwrap();
        assert!(store.any_issued().await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_unknown_key() {
        let (store, _dir) = test_store().await;
        store.issue(OwnerId::new(), "default").await.unwrap();

        assert_eq!(store.verify("lexc_nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_plaintext_not_stored() {
        let (store, _dir) = test_store().await;
        let issued = store.issue(OwnerId::new(), "default").await.unwrap();

        let (hash,): (String,) = sqlx::query_as("SELECT key_hash FROM api_keys WHERE id = ?")
            .bind(issued.id.to_string())
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(hash, hash_api_key(&issued.plaintext));
        assert_ne!(hash, issued.plaintext);
    }

    #[tokio::test]
    async fn test_verify_touches_last_used() {
        let (store, _dir) = test_store().await;
        let issued = store.issue(OwnerId::new(), "default").await.unwrap();
        store.verify(&issued.plaintext).await.unwrap();

        let (last_used,): (Option<String>,) =
            sqlx::query_as("SELECT last_used_at FROM api_keys WHERE id = ?")
                .bind(issued.id.to_string())
                .fetch_one(&store.pool.reader)
                .await
                .unwrap();
        assert!(last_used.is_some());
    }
}
