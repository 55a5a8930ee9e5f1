/// Typed client for the remote memory store
///
/// Thin request/response wrapper over the store's HTTP contract. Wire shapes
/// (paths, field names, snake_case keys) are bit-exact with the external
/// service and must stay that way for compatibility. The client performs no
/// retries — retry/backoff policy, if any, belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::MemoryError;

pub mod credentials;

pub use credentials::{
    CredentialProvider, NoCredentials, ServiceCredentials, SessionCredentials, StaticToken,
};

/// A success_score at or above this marks a historical form as "successful".
pub const SUCCESS_SCORE_THRESHOLD: f64 = 7.0;

/// Closed set of form interaction kinds accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Created,
    Filled,
    Analyzed,
    Viewed,
    Edited,
}

impl std::str::FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(InteractionType::Created),
            "filled" => Ok(InteractionType::Filled),
            "analyzed" => Ok(InteractionType::Analyzed),
            "viewed" => Ok(InteractionType::Viewed),
            "edited" => Ok(InteractionType::Edited),
            other => Err(format!(
                "unknown interaction type '{}' (expected created|filled|analyzed|viewed|edited)",
                other
            )),
        }
    }
}

/// Typed view of the `ai_form_analytics` object nested in record metadata.
///
/// Every field is optional: memories written by older code or other
/// subsystems may carry none, some, or malformed analytics, and each field
/// degrades independently to None.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormAnalytics {
    pub success_score: Option<f64>,
    pub generated_field_count: Option<i64>,
    pub generated_field_types: Option<Vec<String>>,
}

impl FormAnalytics {
    /// Pull analytics out of an open metadata map, field by field.
    ///
    /// Returns None when `ai_form_analytics` is absent or not an object.
    fn from_metadata(metadata: &serde_json::Value) -> Option<FormAnalytics> {
        let analytics = metadata.get("ai_form_analytics")?;
        analytics.as_object()?;
        Some(FormAnalytics {
            success_score: analytics.get("success_score").and_then(|v| v.as_f64()),
            generated_field_count: analytics
                .get("generated_field_count")
                .and_then(|v| v.as_i64()),
            generated_field_types: analytics.get("generated_field_types").and_then(|v| {
                v.as_array().map(|arr| {
                    arr.iter()
                        .filter_map(|t| t.as_str().map(String::from))
                        .collect()
                })
            }),
        })
    }

    pub fn is_successful(&self) -> bool {
        self.success_score
            .map_or(false, |s| s >= SUCCESS_SCORE_THRESHOLD)
    }
}

/// A historical interaction snapshot returned by search.
///
/// `relevance_score` is engine-computed and ephemeral — it is not part of
/// the store's wire format and starts at 0 until the scorer populates it.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub text: String,
    pub analytics: Option<FormAnalytics>,
    pub created_at: Option<DateTime<Utc>>,
    pub relevance_score: i64,
}

impl MemoryRecord {
    pub fn is_successful(&self) -> bool {
        self.analytics.as_ref().map_or(false, |a| a.is_successful())
    }
}

/// Result of a search call: records in store order until ranked.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub records: Vec<MemoryRecord>,
    pub total_count: usize,
}

impl SearchResult {
    pub fn empty() -> Self {
        SearchResult { records: Vec::new(), total_count: 0 }
    }
}

/// Acknowledgement for the three insert endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Response of the user-context endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub memories_count: usize,
}

/// Response of the form-history endpoint. Interaction shape is store-owned
/// and passed through opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct FormHistory {
    #[serde(default)]
    pub interactions: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_count: usize,
}

/// Response of the user-preferences endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub preferences: serde_json::Value,
    #[serde(default)]
    pub total_count: usize,
}

// ---------------------------------------------------------------------------
// Wire types (private) — field names match the store contract exactly
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SearchRequest<'a> {
    user_id: &'a str,
    query: &'a str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_type: Option<&'a str>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    memories: Vec<WireMemory>,
    #[serde(default)]
    total_count: usize,
}

#[derive(Deserialize)]
struct WireMemory {
    #[serde(default)]
    memory: String,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
    #[serde(default)]
    created_at: Option<String>,
}

impl WireMemory {
    fn into_record(self) -> MemoryRecord {
        let analytics = self
            .metadata
            .as_ref()
            .and_then(FormAnalytics::from_metadata);
        // Unparseable timestamps forfeit the recency bonus, nothing more.
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        MemoryRecord {
            text: self.memory,
            analytics,
            created_at,
            relevance_score: 0,
        }
    }
}

#[derive(Serialize)]
struct ConversationRequest<'a> {
    user_id: &'a str,
    user_message: &'a str,
    assistant_response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Serialize)]
struct FormInteractionRequest<'a> {
    user_id: &'a str,
    form_id: &'a str,
    form_title: &'a str,
    interaction_type: InteractionType,
    details: &'a serde_json::Value,
}

#[derive(Serialize)]
struct PreferenceRequest<'a> {
    user_id: &'a str,
    preference_type: &'a str,
    preference_value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Serialize)]
struct UserContextRequest<'a> {
    user_id: &'a str,
    query: &'a str,
}

#[derive(Serialize)]
struct FormHistoryRequest<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    form_id: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Reqwest-backed memory store client.
///
/// Owns one HTTP client with the configured per-request timeout. The
/// credential provider is consulted before every request; a None token
/// sends the request without an Authorization header.
pub struct MemoryStoreClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl MemoryStoreClient {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, MemoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MemoryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(MemoryStoreClient {
            client,
            base_url: config.store_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Full-text search over a user's memories.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        memory_type: Option<&str>,
    ) -> Result<SearchResult, MemoryError> {
        let request = SearchRequest { user_id, query, limit, memory_type };
        let response: SearchResponse = self.post_json("/memory/search", &request).await?;

        let records: Vec<MemoryRecord> = response
            .memories
            .into_iter()
            .map(WireMemory::into_record)
            .collect();

        Ok(SearchResult { records, total_count: response.total_count })
    }

    /// Record one conversation turn as a new memory.
    pub async fn add_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        assistant_response: &str,
        context: Option<&str>,
    ) -> Result<Ack, MemoryError> {
        let request = ConversationRequest { user_id, user_message, assistant_response, context };
        self.post_json("/memory/conversation", &request).await
    }

    /// Record a form interaction event as a new memory.
    pub async fn add_form_interaction(
        &self,
        user_id: &str,
        form_id: &str,
        form_title: &str,
        interaction_type: InteractionType,
        details: &serde_json::Value,
    ) -> Result<Ack, MemoryError> {
        let request = FormInteractionRequest {
            user_id,
            form_id,
            form_title,
            interaction_type,
            details,
        };
        self.post_json("/memory/form-interaction", &request).await
    }

    /// Record a user preference as a new memory.
    pub async fn add_user_preference(
        &self,
        user_id: &str,
        preference_type: &str,
        preference_value: &str,
        context: Option<&str>,
    ) -> Result<Ack, MemoryError> {
        let request = PreferenceRequest { user_id, preference_type, preference_value, context };
        self.post_json("/memory/user-preference", &request).await
    }

    /// Fetch the store's own pre-rendered context string for a query.
    pub async fn get_user_context(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<UserContext, MemoryError> {
        let request = UserContextRequest { user_id, query };
        self.post_json("/memory/user-context", &request).await
    }

    /// Fetch interaction history, optionally narrowed to one form.
    pub async fn get_form_history(
        &self,
        user_id: &str,
        form_id: Option<&str>,
    ) -> Result<FormHistory, MemoryError> {
        let request = FormHistoryRequest { user_id, form_id };
        self.post_json("/memory/form-history", &request).await
    }

    /// Fetch all stored preferences for a user.
    ///
    /// User ids are opaque strings, so the id goes into the URL as a single
    /// percent-encoded path segment — an id containing `/`, `?`, or `#`
    /// must not change the URL structure.
    pub async fn get_user_preferences(
        &self,
        user_id: &str,
    ) -> Result<UserPreferences, MemoryError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| MemoryError::Config(format!("Invalid store base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MemoryError::Config("Store base URL cannot be a base".to_string()))?
            .extend(["memory", "user-preferences", user_id]);
        self.get_json(url).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, MemoryError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = self.credentials.bearer_token().await {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, url: reqwest::Url) -> Result<R, MemoryError> {
        let mut request = self.client.get(url);
        if let Some(token) = self.credentials.bearer_token().await {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, MemoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MemoryError::from_status(status.as_u16(), body));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| MemoryError::Decode(e.to_string()))
    }
}
