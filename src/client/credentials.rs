/// Credential providers for the memory store client
///
/// The store expects `Authorization: Bearer <token>` when the deployment
/// requires auth. Token acquisition is best-effort by contract: a provider
/// that cannot produce a token returns None and the request goes out
/// unauthenticated — the store itself rejects when auth is mandatory.

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Capability for sourcing an optional bearer token before each request.
///
/// Implementations must be Send + Sync so a single client can be shared
/// across tasks (Arc<dyn CredentialProvider>).
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return the current bearer token, or None to send unauthenticated.
    async fn bearer_token(&self) -> Option<String>;
}

/// Always unauthenticated. Suitable for open deployments and tests.
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token supplied at construction time.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken { token: token.into() }
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Interactive-session-backed provider.
///
/// Holds a rotating token slot the surrounding application updates on
/// sign-in, refresh, and sign-out. An empty slot downgrades requests to
/// unauthenticated rather than failing closed.
#[derive(Default)]
pub struct SessionCredentials {
    token: RwLock<Option<String>>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session token after sign-in or refresh.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Drop the session token on sign-out.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait]
impl CredentialProvider for SessionCredentials {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

/// Service-context-backed provider.
///
/// Reads the token from an environment variable on every call so rotated
/// service credentials take effect without a restart. A missing or empty
/// variable yields None.
pub struct ServiceCredentials {
    env_var: String,
}

impl ServiceCredentials {
    pub fn new(env_var: impl Into<String>) -> Self {
        ServiceCredentials { env_var: env_var.into() }
    }
}

#[async_trait]
impl CredentialProvider for ServiceCredentials {
    async fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_credentials_yields_none() {
        assert_eq!(NoCredentials.bearer_token().await, None);
    }

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken::new("abc123");
        assert_eq!(provider.bearer_token().await, Some("abc123".to_string()));
    }

    #[tokio::test]
    async fn test_session_token_rotation() {
        let session = SessionCredentials::new();
        assert_eq!(session.bearer_token().await, None);

        session.set_token("first").await;
        assert_eq!(session.bearer_token().await, Some("first".to_string()));

        session.set_token("second").await;
        assert_eq!(session.bearer_token().await, Some("second".to_string()));

        session.clear_token().await;
        assert_eq!(session.bearer_token().await, None);
    }

    #[tokio::test]
    async fn test_service_credentials_missing_var() {
        let provider = ServiceCredentials::new("FORMRECALL_TEST_TOKEN_UNSET");
        assert_eq!(provider.bearer_token().await, None);
    }
}
