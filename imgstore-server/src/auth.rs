use crate::server::ServerState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check guarding write endpoints
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    api_key: Option<String>,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Constant-time comparison; never matches when either side is empty
    pub fn validate(&self, provided: &str) -> bool {
        match &self.api_key {
            Some(expected) if !provided.is_empty() => {
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            _ => false,
        }
    }
}

/// Pull the key from `Authorization: Bearer <key>` or `X-API-Key: <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .or_else(|| headers.get(API_KEY_HEADER))?
        .to_str()
        .ok()?;

    let key = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if key.is_empty() {
        return None;
    }

    Some(key.to_string())
}

/// Extractor that only succeeds for requests carrying a valid API key
pub struct WriteAccess;

#[axum::async_trait]
impl FromRequestParts<Arc<ServerState>> for WriteAccess {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        let authorized = extract_api_key(&parts.headers)
            .is_some_and(|key| state.auth.validate(&key));

        if authorized {
            return Ok(WriteAccess);
        }

        tracing::warn!(
            "Rejected unauthenticated {} {}",
            parts.method,
            parts.uri.path()
        );
        Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Unauthorized: valid API key required",
            })),
        )
            .into_response())
    }
}
