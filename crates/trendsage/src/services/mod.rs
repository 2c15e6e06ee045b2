//! Request-level services.
//!
//! Each service function takes the shared [`AppContext`], validates its input,
//! calls the providers, and returns a response model.

pub mod analytics;
pub mod catalog;
pub mod search;
pub mod trends;

use std::sync::Arc;

pub use analytics::{Analytics, AnalyticsStore, InMemoryAnalytics, SearchTrack};
pub use search::Requester;
pub use trends::TrendChartGenerator;

use crate::client::{self, DocumentProvider, InsightProvider, MockDocuments, MockInsights, Providers};
use crate::config::Config;

/// Shared state for request handling.
#[derive(Clone)]
pub struct AppContext {
    /// Document search provider.
    pub documents: Arc<dyn DocumentProvider>,

    /// Summary and sub-topic provider.
    pub insights: Arc<dyn InsightProvider>,

    /// Analytics facade.
    pub analytics: Analytics,

    /// Synthetic chart generator.
    pub charts: Arc<TrendChartGenerator>,
}

impl AppContext {
    /// Assemble a context from its parts.
    #[must_use]
    pub fn new(
        providers: Providers,
        store: Arc<dyn AnalyticsStore>,
        charts: TrendChartGenerator,
    ) -> Self {
        Self {
            documents: providers.documents,
            insights: providers.insights,
            analytics: Analytics::new(store),
            charts: Arc::new(charts),
        }
    }

    /// Build providers and an in-memory store from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a provider client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let providers = client::build_providers(config)?;
        let store = Arc::new(InMemoryAnalytics::from_config(config));
        Ok(Self::new(providers, store, TrendChartGenerator::new()))
    }

    /// Mock providers, a fresh store and a seeded chart generator.
    #[must_use]
    pub fn with_mocks(seed: u64) -> Self {
        let providers = Providers { documents: Arc::new(MockDocuments), insights: Arc::new(MockInsights) };
        Self::new(providers, Arc::new(InMemoryAnalytics::default()), TrendChartGenerator::seeded(seed))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("documents", &self.documents.name())
            .field("insights", &self.insights.name())
            .finish()
    }
}
