/// Retrieval orchestrator
///
/// Ties keyword extraction, query composition, the store client, scoring,
/// and insight synthesis into the public operations. Stateless: every call
/// builds its own query, makes at most one outbound store call, and returns.
///
/// Failure policy: memory enhancement is optional, so nothing here may land
/// on the caller's critical failure path. `search_with_context` surfaces
/// store failures as a typed `Err` (logged at warn) for callers and tests
/// that want to observe them; `get_enhanced_context` and the tracking
/// helpers swallow every failure and log.

use std::sync::Arc;

use chrono::Utc;

use crate::client::{
    CredentialProvider, InteractionType, MemoryStoreClient, SearchResult,
};
use crate::config::Config;
use crate::errors::MemoryError;
use crate::insight::synthesize;
use crate::keywords::extract_keywords;
use crate::query::compose_query;
use crate::scoring::rank;

/// Memory type tag the store uses for form interaction records.
const FORM_INTERACTION_TYPE: &str = "form_interaction";

pub struct RecallEngine {
    client: Arc<MemoryStoreClient>,
    search_limit: usize,
    context_limit: usize,
}

impl RecallEngine {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, MemoryError> {
        let client = Arc::new(MemoryStoreClient::new(config, credentials)?);
        Ok(Self::with_client(client, config))
    }

    /// Build the engine around an existing client (shared across engines or
    /// injected by tests).
    pub fn with_client(client: Arc<MemoryStoreClient>, config: &Config) -> Self {
        RecallEngine {
            client,
            search_limit: config.search_limit,
            context_limit: config.context_limit,
        }
    }

    /// Direct access to the underlying store client for the read/write
    /// operations that bypass ranking (context, history, preferences).
    pub fn client(&self) -> &MemoryStoreClient {
        &self.client
    }

    /// Search the user's memories for the prompt and re-rank the hits.
    ///
    /// A blank prompt short-circuits to an empty result without touching the
    /// network. Store and transport failures are logged and returned as
    /// `Err` — the caller treats that as "context unavailable", not as a
    /// reason to fail its own request.
    pub async fn search_with_context(
        &self,
        user_id: &str,
        prompt: &str,
        limit: Option<usize>,
        memory_type: Option<&str>,
    ) -> Result<SearchResult, MemoryError> {
        if prompt.trim().is_empty() {
            return Ok(SearchResult::empty());
        }

        let limit = limit.unwrap_or(self.search_limit);
        let keywords = extract_keywords(prompt);
        let query = compose_query(prompt, &keywords);

        tracing::debug!(
            user_id,
            query = %query,
            keyword_count = keywords.len(),
            limit,
            "Searching memory store"
        );

        let raw = match self.client.search(user_id, &query, limit, memory_type).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Memory search failed, context unavailable");
                return Err(e);
            }
        };

        let total_count = raw.total_count;
        let records = rank(raw.records, &keywords, limit, Utc::now());

        tracing::debug!(
            user_id,
            returned = records.len(),
            total_count,
            "Memory search ranked"
        );

        Ok(SearchResult { records, total_count })
    }

    /// Build the "Memory insights: ..." context string for prompt
    /// enhancement. Returns an empty string whenever no enhancement is
    /// available — on store failure, zero hits, or an empty insight.
    pub async fn get_enhanced_context(&self, user_id: &str, prompt: &str) -> String {
        let result = match self
            .search_with_context(
                user_id,
                prompt,
                Some(self.context_limit),
                Some(FORM_INTERACTION_TYPE),
            )
            .await
        {
            Ok(result) => result,
            Err(_) => return String::new(),
        };

        if result.records.is_empty() {
            return String::new();
        }

        let keywords = extract_keywords(prompt);
        let insight = synthesize(&result, &keywords);
        if insight.is_empty() {
            return String::new();
        }

        tracing::debug!(
            user_id,
            lines = insight.summary_lines.len(),
            successful = insight.stats.successful_count,
            "Synthesized memory insight"
        );

        format!("Memory insights: {}.", insight.summary_lines.join(". "))
    }

    /// Best-effort: record a form interaction. Failures are logged and
    /// swallowed — callers never observe them.
    pub async fn track_form_interaction(
        &self,
        user_id: &str,
        form_id: &str,
        form_title: &str,
        interaction_type: InteractionType,
        details: &serde_json::Value,
    ) {
        if let Err(e) = self
            .client
            .add_form_interaction(user_id, form_id, form_title, interaction_type, details)
            .await
        {
            tracing::warn!(user_id, form_id, error = %e, "Failed to track form interaction");
        }
    }

    /// Best-effort: record a user preference. Failures are logged and
    /// swallowed.
    pub async fn track_user_preference(
        &self,
        user_id: &str,
        preference_type: &str,
        preference_value: &str,
        context: Option<&str>,
    ) {
        if let Err(e) = self
            .client
            .add_user_preference(user_id, preference_type, preference_value, context)
            .await
        {
            tracing::warn!(user_id, preference_type, error = %e, "Failed to track user preference");
        }
    }
}
