//! Development-mode fallback: substitute mock data when the live provider fails.
//!
//! This masks real outages, so it is only installed in development mode.

use super::{DocumentProvider, InsightProvider};
use crate::error::ClientResult;
use crate::models::{Document, SearchResult, SubTopic, TrendSummary};

/// A live provider paired with a mock used when the live call fails.
#[derive(Debug, Clone)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
    name: String,
}

impl<P: DocumentProvider, F: DocumentProvider> WithFallback<P, F> {
    /// Wrap a document provider.
    #[must_use]
    pub fn documents(primary: P, fallback: F) -> Self {
        let name = format!("{}+fallback", DocumentProvider::name(&primary));
        Self { primary, fallback, name }
    }
}

impl<P: InsightProvider, F: InsightProvider> WithFallback<P, F> {
    /// Wrap an insight provider.
    #[must_use]
    pub fn insights(primary: P, fallback: F) -> Self {
        let name = format!("{}+fallback", InsightProvider::name(&primary));
        Self { primary, fallback, name }
    }
}

#[async_trait::async_trait]
impl<P: DocumentProvider, F: DocumentProvider> DocumentProvider for WithFallback<P, F> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, limit: usize) -> ClientResult<SearchResult> {
        match self.primary.search(query, limit).await {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::warn!(query, error = %err, "Document search failed, falling back to mock data");
                self.fallback.search(query, limit).await
            }
        }
    }
}

#[async_trait::async_trait]
impl<P: InsightProvider, F: InsightProvider> InsightProvider for WithFallback<P, F> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn summarize(&self, query: &str, documents: &[Document]) -> ClientResult<TrendSummary> {
        match self.primary.summarize(query, documents).await {
            Ok(summary) => Ok(summary),
            Err(err) => {
                tracing::warn!(query, error = %err, "Summary failed, falling back to mock summary");
                self.fallback.summarize(query, documents).await
            }
        }
    }

    async fn sub_topics(&self, query: &str, documents: &[Document]) -> ClientResult<Vec<SubTopic>> {
        match self.primary.sub_topics(query, documents).await {
            Ok(topics) => Ok(topics),
            Err(err) => {
                tracing::warn!(query, error = %err, "Sub-topics failed, falling back to mock sub-topics");
                self.fallback.sub_topics(query, documents).await
            }
        }
    }
}
