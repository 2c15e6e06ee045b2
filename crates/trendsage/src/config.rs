//! Configuration for the TrendSage service.

use std::time::Duration;

use anyhow::Context;

/// Provider endpoint and transport constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Veritus scholarly-search API.
    pub const VERITUS_API: &str = "https://discover.veritus.ai/api";

    /// Paper search path, appended to the Veritus base URL.
    pub const PAPER_SEARCH_PATH: &str = "/v1/papers/search";

    /// Base URL for the OpenAI-compatible chat completion API.
    pub const OPENAI_API: &str = "https://api.openai.com/v1";

    /// Chat completion path, appended to the LLM base URL.
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

    /// Document search request timeout.
    pub const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(30);

    /// LLM request timeout. Completions of 1500 tokens routinely take 20-40s.
    pub const LLM_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL for document searches (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cached document searches.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections per host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Placeholder shipped in `.env.example` for the Veritus key.
    pub const VERITUS_PLACEHOLDER_KEY: &str = "your_veritus_api_key_here";

    /// Placeholder shipped in `.env.example` for the OpenAI key.
    pub const OPENAI_PLACEHOLDER_KEY: &str = "your_openai_api_key_here";
}

/// LLM generation parameters.
pub mod llm {
    /// Default chat model.
    pub const DEFAULT_MODEL: &str = "gpt-4o";

    /// Model identifier reported by the deterministic mock provider.
    pub const MOCK_MODEL: &str = "mock";

    /// Sampling temperature for trend summaries.
    pub const SUMMARY_TEMPERATURE: f32 = 0.7;

    /// Token budget for trend summaries.
    pub const SUMMARY_MAX_TOKENS: u32 = 1500;

    /// Sampling temperature for sub-topic clustering.
    pub const SUBTOPIC_TEMPERATURE: f32 = 0.5;

    /// Token budget for sub-topic clustering.
    pub const SUBTOPIC_MAX_TOKENS: u32 = 800;

    /// Abstract excerpt length used in the sub-topic prompt.
    pub const SUBTOPIC_ABSTRACT_CHARS: usize = 200;
}

/// Request and aggregation limits.
pub mod limits {
    /// Maximum query length after sanitization (characters).
    pub const MAX_QUERY_LEN: usize = 500;

    /// Minimum query length after sanitization (characters).
    pub const MIN_QUERY_LEN: usize = 2;

    /// Documents requested when the caller gives no limit.
    pub const DEFAULT_DOCUMENT_LIMIT: usize = 5;

    /// Upper bound on requested documents.
    pub const MAX_DOCUMENT_LIMIT: usize = 50;

    /// Events retained per event kind.
    pub const EVENT_CAPACITY: usize = 10_000;

    /// Distinct normalized queries retained for trending.
    pub const TRENDING_CAPACITY: usize = 10_000;

    /// Distinct queries needed before trending reflects real traffic.
    pub const MIN_TRENDING_TOPICS: usize = 5;

    /// Default number of trending topics returned.
    pub const DEFAULT_TRENDING_LIMIT: usize = 10;

    /// Entries in the analytics top-queries ranking.
    pub const TOP_QUERIES: usize = 10;

    /// Maximum autocomplete suggestions.
    pub const MAX_SUGGESTIONS: usize = 8;

    /// Minimum prefix length before suggestions are offered.
    pub const MIN_SUGGESTION_LEN: usize = 2;

    /// Unique-user goal tracked by the goal-progress endpoint.
    pub const USER_GOAL: usize = 69;
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    /// Provider failures are masked with mock data. Debug aid only.
    #[value(alias = "dev")]
    Development,
    /// Provider failures surface to the caller.
    #[default]
    #[value(alias = "prod")]
    Production,
}

impl RunMode {
    /// Parse a mode name, accepting the usual `dev`/`prod` abbreviations.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// Veritus API key (optional; mock documents are served without it).
    pub veritus_api_key: Option<String>,

    /// OpenAI API key (optional; mock summaries are served without it).
    pub openai_api_key: Option<String>,

    /// Base URL for the Veritus API (for testing with mock servers).
    pub veritus_api_url: String,

    /// Base URL for the chat completion API (for testing with mock servers).
    pub openai_api_url: String,

    /// Chat model identifier.
    pub model: String,

    /// Document search timeout.
    pub document_timeout: Duration,

    /// LLM request timeout.
    pub llm_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Document search cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cached document searches.
    pub cache_max_size: u64,

    /// Events retained per event kind.
    pub event_capacity: usize,

    /// Distinct trending queries retained.
    pub trending_capacity: usize,

    /// Deployment mode.
    pub mode: RunMode,
}

impl Config {
    /// Create a new configuration from optional provider credentials.
    ///
    /// Blank keys and the `.env.example` placeholders are treated as absent.
    #[must_use]
    pub fn new(veritus_api_key: Option<String>, openai_api_key: Option<String>) -> Self {
        Self {
            veritus_api_key: credential(veritus_api_key, api::VERITUS_PLACEHOLDER_KEY),
            openai_api_key: credential(openai_api_key, api::OPENAI_PLACEHOLDER_KEY),
            veritus_api_url: api::VERITUS_API.to_string(),
            openai_api_url: api::OPENAI_API.to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            document_timeout: api::DOCUMENT_TIMEOUT,
            llm_timeout: api::LLM_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            event_capacity: limits::EVENT_CAPACITY,
            trending_capacity: limits::TRENDING_CAPACITY,
            mode: RunMode::Production,
        }
    }

    /// Create a test configuration pointing both providers at one mock server.
    ///
    /// Credentials are set so the live clients are selected.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            veritus_api_key: Some("test-veritus-key".to_string()),
            openai_api_key: Some("test-openai-key".to_string()),
            veritus_api_url: base_url.to_string(),
            openai_api_url: format!("{}/v1", base_url),
            model: llm::DEFAULT_MODEL.to_string(),
            document_timeout: Duration::from_secs(5),
            llm_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            event_capacity: limits::EVENT_CAPACITY,
            trending_capacity: limits::TRENDING_CAPACITY,
            mode: RunMode::Production,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a URL or the run mode is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(
            std::env::var("VERITUS_API_KEY").ok(),
            std::env::var("OPENAI_API_KEY").ok(),
        );

        if let Ok(url) = std::env::var("VERITUS_API_URL") {
            config.veritus_api_url = url;
        }
        if let Ok(url) = std::env::var("OPENAI_API_URL") {
            config.openai_api_url = url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(mode) = std::env::var("TRENDSAGE_ENV") {
            config.mode = RunMode::parse(&mode)
                .with_context(|| format!("TRENDSAGE_ENV must be development or production, got {mode:?}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the provider URLs parse.
    ///
    /// # Errors
    ///
    /// Returns error naming the offending URL.
    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.veritus_api_url)
            .with_context(|| format!("invalid Veritus API URL: {}", self.veritus_api_url))?;
        url::Url::parse(&self.openai_api_url)
            .with_context(|| format!("invalid LLM API URL: {}", self.openai_api_url))?;
        Ok(())
    }

    /// Set the run mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check if a document-search credential is configured.
    #[must_use]
    pub const fn has_document_credential(&self) -> bool {
        self.veritus_api_key.is_some()
    }

    /// Check if an LLM credential is configured.
    #[must_use]
    pub const fn has_llm_credential(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Whether provider failures fall back to mock data.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.mode == RunMode::Development
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_document_credential", &self.has_document_credential())
            .field("has_llm_credential", &self.has_llm_credential())
            .field("veritus_api_url", &self.veritus_api_url)
            .field("openai_api_url", &self.openai_api_url)
            .field("model", &self.model)
            .field("mode", &self.mode)
            .finish()
    }
}

fn credential(key: Option<String>, placeholder: &str) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.has_document_credential());
        assert!(!config.has_llm_credential());
        assert_eq!(config.mode, RunMode::Production);
    }

    #[test]
    fn test_placeholder_keys_count_as_absent() {
        let config = Config::new(
            Some(api::VERITUS_PLACEHOLDER_KEY.to_string()),
            Some("   ".to_string()),
        );
        assert!(!config.has_document_credential());
        assert!(!config.has_llm_credential());
    }

    #[test]
    fn test_real_keys_are_kept() {
        let config = Config::new(Some("vk".to_string()), Some("ok".to_string()));
        assert_eq!(config.veritus_api_key.as_deref(), Some("vk"));
        assert_eq!(config.openai_api_key.as_deref(), Some("ok"));
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!(RunMode::parse("Development"), Some(RunMode::Development));
        assert_eq!(RunMode::parse("prod"), Some(RunMode::Production));
        assert_eq!(RunMode::parse("staging"), None);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.veritus_api_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = Config::new(Some("secret-veritus".to_string()), None);
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-veritus"));
        assert!(debug.contains("has_document_credential"));
    }
}
