//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and looked up in the `api_keys` table; each key
//! resolves to the owner whose conversation the request acts on.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use lexchat_types::error::ChatError;
use lexchat_types::identity::OwnerId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated owner. Extracting this validates the API key.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub OwnerId);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(api_key) = extract_api_key(parts) else {
            debug!(uri = %parts.uri, "Request without a usable API key");
            return Err(ChatError::AuthRequired.into());
        };

        let owner = state
            .api_keys
            .verify(&api_key)
            .await
            .map_err(|e| AppError::Internal(format!("API key lookup failed: {e}")))?;

        match owner {
            Some(owner) => Ok(Authenticated(owner)),
            None => {
                debug!(uri = %parts.uri, "Unknown API key");
                Err(ChatError::AuthRequired.into())
            }
        }
    }
}

/// The key from `Authorization: Bearer <key>`, else from `X-API-Key`.
///
/// Blank values and headers that are not valid ASCII count as absent.
fn extract_api_key(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let x_api_key = parts
        .headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    [bearer, x_api_key]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}
