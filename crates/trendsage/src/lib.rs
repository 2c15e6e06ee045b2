//! TrendSage
//!
//! Backend for a market-trend research assistant. A free-text query is run
//! against a scholarly search provider, the retrieved documents are
//! synthesized by an LLM into a cited trend summary and sub-topic clusters,
//! and every search feeds an in-memory analytics store that ranks trending
//! topics.
//!
//! # Features
//!
//! - **Pluggable providers**: live Veritus and chat-completion clients, or
//!   deterministic mocks when no credential is configured
//! - **Validated synthesis**: LLM replies are parsed and checked, and citations
//!   are kept within the source list
//! - **Bounded analytics**: ring-buffered events and a capped trending map
//! - **Cached**: 5-minute TTL cache on document searches
//!
//! # Example
//!
//! ```no_run
//! use trendsage::{config::Config, server::TrendSageServer, services::AppContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let ctx = AppContext::from_config(&config)?;
//!
//!     TrendSageServer::new(ctx).run_http(3001).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

pub use config::Config;
pub use error::{ClientError, ServiceError};
pub use server::TrendSageServer;
pub use services::AppContext;
