//! Scholarly document model and Veritus response normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Venue used when the provider reports none.
const DEFAULT_SOURCE: &str = "Academic Source";

/// A retrieved scholarly record, the evidentiary input to summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Provider identifier (or `doc-{index}` when missing).
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Author names in publication order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Abstract text, possibly empty.
    #[serde(default)]
    pub r#abstract: String,

    /// Link to the paper.
    #[serde(default)]
    pub url: Option<String>,

    /// Publication venue.
    #[serde(default = "default_source")]
    pub source: String,

    /// Publication date or year as free text.
    #[serde(default)]
    pub published_date: String,

    /// Citation count.
    #[serde(default)]
    pub citations: u64,

    /// Provider-defined relevance score.
    #[serde(default)]
    pub relevance_score: f64,

    /// Fields of study.
    #[serde(default)]
    pub fields_of_study: Vec<String>,

    /// Whether the paper is open access.
    #[serde(default)]
    pub is_open_access: bool,

    /// Journal quartile ranking (e.g. "Q1").
    #[serde(default)]
    pub quartile_ranking: Option<String>,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Documents returned by a provider search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Documents, truncated to the requested limit.
    pub documents: Vec<Document>,

    /// Number of documents before truncation.
    pub total_results: usize,
}

impl SearchResult {
    /// Build a result from the full provider list, keeping the first `limit`.
    #[must_use]
    pub fn truncated(mut documents: Vec<Document>, limit: usize) -> Self {
        let total_results = documents.len();
        documents.truncate(limit);
        Self { documents, total_results }
    }

    /// True when the provider found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Citation-facing projection of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// 1-based position in the document list.
    pub index: usize,

    /// Paper title.
    pub title: String,

    /// Link to the paper.
    pub url: Option<String>,

    /// Publication venue.
    pub source: String,

    /// Publication date or year.
    pub published_date: String,
}

impl Source {
    /// Project documents into sources, 1:1 by position.
    #[must_use]
    pub fn from_documents(documents: &[Document]) -> Vec<Self> {
        documents
            .iter()
            .enumerate()
            .map(|(i, doc)| Self {
                index: i + 1,
                title: doc.title.clone(),
                url: doc.url.clone(),
                source: doc.source.clone(),
                published_date: doc.published_date.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Veritus wire format
// ---------------------------------------------------------------------------

/// Raw Veritus search response: either a bare array or a wrapped list.
///
/// Papers stay as raw JSON here and are parsed one at a time in
/// [`VeritusResponse::into_papers`], so one malformed entry only drops itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VeritusResponse {
    /// `[paper, ...]`
    List(Vec<Value>),
    /// `{"results": [...]}` or `{"result": [...]}`
    Wrapped {
        #[serde(default)]
        results: Option<Vec<Value>>,
        #[serde(default)]
        result: Option<Vec<Value>>,
    },
}

impl VeritusResponse {
    /// Parse the paper list, whichever shape the provider used.
    ///
    /// Each paper is paired with its position in the provider list. Entries
    /// that are not paper objects are skipped with a warning.
    #[must_use]
    pub fn into_papers(self) -> Vec<(usize, VeritusPaper)> {
        let raw = match self {
            Self::List(papers) => papers,
            Self::Wrapped { results, result } => results.or(result).unwrap_or_default(),
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<VeritusPaper>(value) {
                Ok(paper) => Some((i, paper)),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "Skipping malformed Veritus paper");
                    None
                }
            })
            .collect()
    }

    /// Normalize into canonical documents, keeping the first `limit`.
    #[must_use]
    pub fn normalize(self, limit: usize) -> SearchResult {
        let papers = self.into_papers();
        let total_results = papers.len();
        let documents = papers
            .into_iter()
            .take(limit)
            .map(|(i, paper)| paper.into_document(i))
            .collect();
        SearchResult { documents, total_results }
    }
}

/// Author list as sent by Veritus: a comma-separated string or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VeritusAuthors {
    /// `"Chen, L., Wang, M."` style.
    Joined(String),
    /// `["Chen, L.", "Wang, M."]` style.
    List(Vec<String>),
}

impl VeritusAuthors {
    fn into_names(self) -> Vec<String> {
        match self {
            Self::Joined(s) => s
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect(),
            Self::List(names) => names,
        }
    }
}

/// Impact metrics block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactFactor {
    /// Citation count reported inside the impact block, number or string.
    #[serde(default)]
    pub citation_count: Option<Value>,
}

/// A paper as returned by the Veritus paper search.
///
/// Field names vary between endpoints, so nearly everything is optional. The
/// identifier, year and citation counts arrive as either strings or numbers
/// and are kept as raw JSON until [`VeritusPaper::into_document`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeritusPaper {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<VeritusAuthors>,
    #[serde(default)]
    pub r#abstract: Option<String>,
    #[serde(default)]
    pub tldr: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pdf_link: Option<String>,
    #[serde(default)]
    pub title_link: Option<String>,
    #[serde(default)]
    pub semantic_link: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub journal_name: Option<String>,
    #[serde(default, rename = "v_journal_name")]
    pub v_journal_name: Option<String>,
    #[serde(default)]
    pub publication_type: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub impact_factor: Option<ImpactFactor>,
    #[serde(default)]
    pub citation_count: Option<Value>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub fields_of_study: Option<Vec<String>>,
    #[serde(default)]
    pub is_open_access: Option<bool>,
    #[serde(default, rename = "v_quartile_ranking")]
    pub v_quartile_ranking: Option<String>,
}

/// First non-blank string among the candidates.
fn first_present(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

/// Text form of a scalar sent as a string or a number.
fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative count from a number or a numeric string. Fractions truncate.
fn scalar_count(value: Option<&Value>) -> Option<u64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n as u64)
}

impl VeritusPaper {
    /// Convert into the canonical document shape.
    #[must_use]
    pub fn into_document(self, index: usize) -> Document {
        let doi_url = self.doi.filter(|d| !d.is_empty()).map(|d| format!("https://doi.org/{d}"));

        let citations = scalar_count(self.impact_factor.and_then(|i| i.citation_count).as_ref())
            .filter(|&c| c > 0)
            .or_else(|| scalar_count(self.citation_count.as_ref()))
            .unwrap_or(0);

        Document {
            id: first_present([scalar_text(self.id)]).unwrap_or_else(|| format!("doc-{index}")),
            title: first_present([self.title]).unwrap_or_else(|| "Untitled".to_string()),
            authors: self.authors.map(VeritusAuthors::into_names).unwrap_or_default(),
            r#abstract: first_present([self.r#abstract, self.tldr]).unwrap_or_default(),
            url: first_present([
                self.link,
                self.title_link,
                self.pdf_link,
                self.semantic_link,
                doi_url,
            ]),
            source: first_present([self.journal_name, self.v_journal_name, self.publication_type])
                .unwrap_or_else(default_source),
            published_date: first_present([self.published_at, scalar_text(self.year)])
                .unwrap_or_default(),
            citations,
            relevance_score: self.score.filter(|s| s.is_finite()).unwrap_or(0.0),
            fields_of_study: self.fields_of_study.unwrap_or_default(),
            is_open_access: self.is_open_access.unwrap_or(false),
            quartile_ranking: self.v_quartile_ranking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_array() {
        let raw: VeritusResponse = serde_json::from_value(json!([
            {"id": "a", "title": "First", "authors": "Chen L., Wang M. ,"},
            {"title": "Second", "authors": ["Smith, J."]}
        ]))
        .unwrap();

        let result = raw.normalize(5);
        assert_eq!(result.total_results, 2);
        assert_eq!(result.documents[0].id, "a");
        assert_eq!(result.documents[0].authors, vec!["Chen L.", "Wang M."]);
        assert_eq!(result.documents[1].id, "doc-1");
        assert_eq!(result.documents[1].authors, vec!["Smith, J."]);
    }

    #[test]
    fn test_normalize_wrapped_and_truncated() {
        let raw: VeritusResponse = serde_json::from_value(json!({
            "results": [{"title": "A"}, {"title": "B"}, {"title": "C"}]
        }))
        .unwrap();

        let result = raw.normalize(2);
        assert_eq!(result.total_results, 3);
        assert_eq!(result.documents.len(), 2);
    }

    #[test]
    fn test_normalize_result_key() {
        let raw: VeritusResponse =
            serde_json::from_value(json!({"result": [{"title": "Only"}]})).unwrap();
        assert_eq!(raw.normalize(5).documents[0].title, "Only");
    }

    #[test]
    fn test_field_fallbacks() {
        let paper: VeritusPaper = serde_json::from_value(json!({
            "abstract": "",
            "tldr": "Short summary",
            "doi": "10.1/x",
            "v_journal_name": "Joule",
            "year": 2023,
            "citationCount": 12,
            "impactFactor": {"citationCount": 0}
        }))
        .unwrap();

        let doc = paper.into_document(3);
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.r#abstract, "Short summary");
        assert_eq!(doc.url.as_deref(), Some("https://doi.org/10.1/x"));
        assert_eq!(doc.source, "Joule");
        assert_eq!(doc.published_date, "2023");
        assert_eq!(doc.citations, 12);
    }

    #[test]
    fn test_numeric_id_and_string_year() {
        let raw: VeritusResponse = serde_json::from_value(json!({
            "results": [{"id": 12345, "title": "A", "year": "2023", "citationCount": 12.0}]
        }))
        .unwrap();

        let doc = &raw.normalize(5).documents[0];
        assert_eq!(doc.id, "12345");
        assert_eq!(doc.published_date, "2023");
        assert_eq!(doc.citations, 12);
    }

    #[test]
    fn test_string_citation_counts() {
        let paper: VeritusPaper = serde_json::from_value(json!({
            "citationCount": "7",
            "impactFactor": {"citationCount": "oops"}
        }))
        .unwrap();
        assert_eq!(paper.into_document(0).citations, 7);
    }

    #[test]
    fn test_malformed_paper_is_skipped() {
        let raw: VeritusResponse = serde_json::from_value(json!([
            {"title": "Good"},
            "not a paper",
            {"title": ["not", "a", "string"]},
            {"title": "Also good"}
        ]))
        .unwrap();

        let result = raw.normalize(5);
        assert_eq!(result.total_results, 2);
        assert_eq!(result.documents[0].title, "Good");
        assert_eq!(result.documents[1].title, "Also good");
        assert_eq!(result.documents[1].id, "doc-3");
    }

    #[test]
    fn test_impact_factor_citations_win() {
        let paper: VeritusPaper = serde_json::from_value(json!({
            "citationCount": 3,
            "impactFactor": {"citationCount": 40}
        }))
        .unwrap();
        assert_eq!(paper.into_document(0).citations, 40);
    }

    #[test]
    fn test_missing_source_defaults() {
        let doc = VeritusPaper::default().into_document(0);
        assert_eq!(doc.source, "Academic Source");
        assert!(doc.url.is_none());
        assert!(!doc.is_open_access);
    }

    #[test]
    fn test_sources_are_positional() {
        let docs = vec![
            VeritusPaper { title: Some("A".into()), ..Default::default() }.into_document(0),
            VeritusPaper { title: Some("B".into()), ..Default::default() }.into_document(1),
        ];
        let sources = Source::from_documents(&docs);
        assert_eq!(sources[0].index, 1);
        assert_eq!(sources[1].index, 2);
        assert_eq!(sources[1].title, "B");
    }

    #[test]
    fn test_document_accepts_minimal_client_json() {
        let doc: Document =
            serde_json::from_value(json!({"id": "x", "title": "Client supplied"})).unwrap();
        assert_eq!(doc.source, "Academic Source");
        assert!(doc.authors.is_empty());
    }
}
