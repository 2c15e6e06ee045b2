//! Trend summary and sub-topic models.
//!
//! `SummaryDraft` and `SubTopicsDraft` are the shapes the LLM is asked to produce;
//! they are validated and completed into [`TrendSummary`] / [`SubTopic`] lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{Document, Source};

/// Direction a trend is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Stable,
    Declining,
}

/// Horizon over which a trend plays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

/// Strength of a sub-topic within the document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    High,
    Medium,
    Low,
}

/// One key takeaway with 1-based citations into the source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTakeaway {
    /// Takeaway text.
    pub text: String,

    /// 1-based indices into the source list.
    #[serde(default, deserialize_with = "lenient_indices")]
    pub citations: Vec<usize>,
}

/// LLM-derived synthesis of a document set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// Overview paragraph.
    pub overview: String,

    /// Key takeaways, in presentation order.
    pub key_takeaways: Vec<KeyTakeaway>,

    /// Predictions and developments to watch.
    pub watch_list: Vec<String>,

    /// How well-established the trend is, 1-10.
    pub confidence_score: u8,

    /// Trend direction.
    pub trend_direction: TrendDirection,

    /// Trend horizon.
    pub time_horizon: TimeHorizon,

    /// Sources derived positionally from the input documents.
    pub sources: Vec<Source>,

    /// When the summary was generated.
    pub generated_at: DateTime<Utc>,

    /// Model identifier ("mock" for the deterministic provider).
    pub model: String,
}

impl TrendSummary {
    /// True if every citation resolves to a source.
    #[must_use]
    pub fn citations_resolve(&self) -> bool {
        let n = self.sources.len();
        self.key_takeaways
            .iter()
            .flat_map(|t| &t.citations)
            .all(|&c| (1..=n).contains(&c))
    }
}

/// A clustered theme within a document set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    /// Sub-topic name.
    pub name: String,

    /// One-sentence description.
    pub description: String,

    /// 1-based indices into the source list.
    #[serde(default, deserialize_with = "lenient_indices")]
    pub relevant_sources: Vec<usize>,

    /// Strength label.
    pub trend_strength: TrendStrength,
}

/// Source indices as the LLM wrote them.
///
/// Entries that are not non-negative integers (negative, fractional, text, null)
/// are dropped, and a lone scalar counts as a one-item list. Range checks are
/// left to [`retain_valid_citations`].
fn lenient_indices<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items
        .iter()
        .filter_map(|v| v.as_u64().and_then(|n| usize::try_from(n).ok()))
        .collect())
}

/// Keep citations within `1..=source_count`, dropping duplicates, order preserved.
fn retain_valid_citations(citations: &mut Vec<usize>, source_count: usize) {
    let mut seen = Vec::with_capacity(citations.len());
    citations.retain(|&c| {
        let keep = (1..=source_count).contains(&c) && !seen.contains(&c);
        if keep {
            seen.push(c);
        }
        keep
    });
}

/// Fields the LLM asserts for a trend summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDraft {
    pub overview: String,
    pub key_takeaways: Vec<KeyTakeaway>,
    pub watch_list: Vec<String>,
    pub confidence_score: f64,
    pub trend_direction: TrendDirection,
    pub time_horizon: TimeHorizon,
}

impl SummaryDraft {
    /// Check the required content is present.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing piece.
    pub fn validate(&self) -> Result<(), String> {
        if self.overview.trim().is_empty() {
            return Err("overview is empty".to_string());
        }
        if self.key_takeaways.is_empty() {
            return Err("keyTakeaways is empty".to_string());
        }
        if self.key_takeaways.iter().any(|t| t.text.trim().is_empty()) {
            return Err("a key takeaway has no text".to_string());
        }
        if !self.confidence_score.is_finite() {
            return Err("confidenceScore is not a number".to_string());
        }
        Ok(())
    }

    /// Complete the draft with sources recomputed from `documents`.
    ///
    /// Citations outside the source list are dropped and the confidence score is
    /// clamped to 1-10.
    #[must_use]
    pub fn finish(self, documents: &[Document], model: impl Into<String>) -> TrendSummary {
        let sources = Source::from_documents(documents);
        let mut key_takeaways = self.key_takeaways;
        for takeaway in &mut key_takeaways {
            retain_valid_citations(&mut takeaway.citations, sources.len());
        }

        TrendSummary {
            overview: self.overview,
            key_takeaways,
            watch_list: self.watch_list,
            confidence_score: self.confidence_score.round().clamp(1.0, 10.0) as u8,
            trend_direction: self.trend_direction,
            time_horizon: self.time_horizon,
            sources,
            generated_at: Utc::now(),
            model: model.into(),
        }
    }
}

/// Sub-topic list as the LLM returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopicsDraft {
    pub sub_topics: Vec<SubTopic>,
}

impl SubTopicsDraft {
    /// Validate names and clamp source indices to `1..=source_count`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if no usable sub-topic remains.
    pub fn finish(self, source_count: usize) -> Result<Vec<SubTopic>, String> {
        let topics: Vec<SubTopic> = self
            .sub_topics
            .into_iter()
            .filter(|t| !t.name.trim().is_empty())
            .map(|mut t| {
                retain_valid_citations(&mut t.relevant_sources, source_count);
                t
            })
            .collect();

        if topics.is_empty() {
            return Err("no named sub-topics".to_string());
        }
        Ok(topics)
    }
}
