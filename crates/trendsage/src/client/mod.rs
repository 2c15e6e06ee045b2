//! Provider clients.
//!
//! Two external capabilities sit behind traits:
//! - [`DocumentProvider`]: scholarly document search (Veritus or mock)
//! - [`InsightProvider`]: trend summaries and sub-topics (chat completion or mock)
//!
//! The live implementation is chosen when a credential is configured. In
//! development mode the live provider is wrapped in [`WithFallback`], which
//! substitutes mock data when a call fails.

mod fallback;
mod mock;
mod openai;
mod veritus;

use std::sync::Arc;

pub use fallback::WithFallback;
pub use mock::{MockDocuments, MockInsights};
pub use openai::OpenAiClient;
pub use veritus::VeritusClient;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Document, SearchResult, SubTopic, TrendSummary};

/// Scholarly document search.
#[async_trait::async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Search for documents matching an already-sanitized query.
    ///
    /// Returns at most `limit` documents; `total_results` is the untruncated count.
    async fn search(&self, query: &str, limit: usize) -> ClientResult<SearchResult>;
}

/// LLM-backed analysis of a document set.
#[async_trait::async_trait]
pub trait InsightProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Synthesize a trend summary citing `documents` by 1-based position.
    async fn summarize(&self, query: &str, documents: &[Document]) -> ClientResult<TrendSummary>;

    /// Cluster `documents` into 3-4 labeled sub-topics.
    async fn sub_topics(&self, query: &str, documents: &[Document]) -> ClientResult<Vec<SubTopic>>;
}

/// Providers selected from configuration.
#[derive(Clone)]
pub struct Providers {
    pub documents: Arc<dyn DocumentProvider>,
    pub insights: Arc<dyn InsightProvider>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("documents", &self.documents.name())
            .field("insights", &self.insights.name())
            .finish()
    }
}

/// Select document and insight providers for `config`.
///
/// # Errors
///
/// Returns error if an HTTP client cannot be built.
pub fn build_providers(config: &Config) -> anyhow::Result<Providers> {
    let documents: Arc<dyn DocumentProvider> = if config.has_document_credential() {
        let live = VeritusClient::new(config)?;
        if config.is_development() {
            Arc::new(WithFallback::documents(live, MockDocuments))
        } else {
            Arc::new(live)
        }
    } else {
        tracing::warn!("No Veritus API key configured, serving mock documents");
        Arc::new(MockDocuments)
    };

    let insights: Arc<dyn InsightProvider> = if config.has_llm_credential() {
        let live = OpenAiClient::new(config)?;
        if config.is_development() {
            Arc::new(WithFallback::insights(live, MockInsights))
        } else {
            Arc::new(live)
        }
    } else {
        tracing::warn!("No OpenAI API key configured, serving mock insights");
        Arc::new(MockInsights)
    };

    tracing::info!(
        documents = documents.name(),
        insights = insights.name(),
        mode = ?config.mode,
        "Providers selected"
    );

    Ok(Providers { documents, insights })
}

/// Map a provider response's status code to a [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        401 | 403 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::Unauthorized { status: status.as_u16(), message: text })
        }
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}
