//! Fuzzing library for trendsage.
//!
//! Targets cover the untrusted inputs: provider search payloads, LLM replies
//! and free-text queries.
//!
//! # Usage
//!
//! ```bash
//! cd crates/trendsage-fuzz
//! cargo +nightly fuzz run fuzz_llm_reply -- -max_total_time=60
//! ```

pub use trendsage::models;
pub use trendsage::services::search::sanitize_query;
