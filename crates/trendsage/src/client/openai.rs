//! Chat-completion client for trend summaries and sub-topics.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint, asks for a JSON
//! object reply, and validates it before it can reach a response.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InsightProvider, check_status};
use crate::config::{Config, api, llm};
use crate::error::{ClientError, ClientResult};
use crate::models::{Document, SubTopic, SubTopicsDraft, SummaryDraft, TrendSummary};

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert market research analyst specializing in \
trend analysis. Always respond with valid JSON. Be concise, factual, and cite sources using [n] \
format.";

const SUBTOPIC_SYSTEM_PROMPT: &str = "You are an expert at categorizing and organizing research \
topics. Respond with valid JSON only.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Live chat-completion insight provider.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the key is missing, is not a valid header value, or the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let key = config
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OpenAI API key is not configured"))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {key}").parse()?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.llm_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.openai_api_url.trim_end_matches('/'),
                api::CHAT_COMPLETIONS_PATH
            ),
            model: config.model.clone(),
            timeout: config.llm_timeout,
        })
    }

    /// Model identifier sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one JSON-mode completion and return the reply text.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> ClientResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature,
            max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        let response = check_status(response).await?;
        let body = response.text().await.map_err(|e| ClientError::transport(e, self.timeout))?;
        reply_content(&body)
    }
}

/// Extract `choices[0].message.content` from a completion body.
fn reply_content(body: &str) -> ClientResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::invalid_completion(format!("malformed completion body: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ClientError::invalid_completion("completion has no content"))
}

/// Parse and validate a summary reply.
pub(crate) fn parse_summary(content: &str) -> ClientResult<SummaryDraft> {
    let draft: SummaryDraft = serde_json::from_str(content)
        .map_err(|e| ClientError::invalid_completion(format!("summary: {e}")))?;
    draft.validate().map_err(ClientError::invalid_completion)?;
    Ok(draft)
}

/// Parse and validate a sub-topic reply against `source_count` sources.
pub(crate) fn parse_sub_topics(content: &str, source_count: usize) -> ClientResult<Vec<SubTopic>> {
    let draft: SubTopicsDraft = serde_json::from_str(content)
        .map_err(|e| ClientError::invalid_completion(format!("sub-topics: {e}")))?;
    draft.finish(source_count).map_err(ClientError::invalid_completion)
}

fn summary_prompt(query: &str, documents: &[Document]) -> String {
    let context = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            format!(
                "[{}] \"{}\" ({}, {})\nAbstract: {}",
                i + 1,
                doc.title,
                doc.source,
                doc.published_date,
                doc.r#abstract
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a market research analyst providing insights on current trends.
Based on the following research documents about "{query}", generate a comprehensive trend analysis.

RESEARCH DOCUMENTS:
{context}

Please provide:
1. A concise overview paragraph (3-4 sentences) summarizing the current state of this trend
2. 4-5 key takeaways as bullet points, each citing the relevant source using [n] format
3. A "What to Watch" section with 2-3 future predictions or emerging developments
4. A confidence score (1-10) for how well-established this trend is based on the evidence

Format your response as JSON with this structure:
{{
  "overview": "string",
  "keyTakeaways": [
    {{"text": "string", "citations": [1, 2]}}
  ],
  "watchList": ["string"],
  "confidenceScore": number,
  "trendDirection": "rising" | "stable" | "declining",
  "timeHorizon": "short-term" | "medium-term" | "long-term"
}}

Citations must be numbers between 1 and {count}. Ensure all claims are grounded in the provided sources. Do not make up information not present in the documents."#,
        count = documents.len()
    )
}

fn sub_topic_prompt(query: &str, documents: &[Document]) -> String {
    let summaries = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            let excerpt: String = doc.r#abstract.chars().take(llm::SUBTOPIC_ABSTRACT_CHARS).collect();
            format!("[{}] {}: {excerpt}...", i + 1, doc.title)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Given these research documents about "{query}", identify 3-4 distinct sub-topics or perspectives.

Documents:
{summaries}

Return JSON:
{{
  "subTopics": [
    {{
      "name": "Sub-topic name",
      "description": "One sentence description",
      "relevantSources": [1, 2],
      "trendStrength": "high" | "medium" | "low"
    }}
  ]
}}"#
    )
}

#[async_trait::async_trait]
impl InsightProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn summarize(&self, query: &str, documents: &[Document]) -> ClientResult<TrendSummary> {
        let prompt = summary_prompt(query, documents);
        let content = self
            .complete(
                SUMMARY_SYSTEM_PROMPT,
                &prompt,
                llm::SUMMARY_TEMPERATURE,
                llm::SUMMARY_MAX_TOKENS,
            )
            .await
            .inspect_err(|e| tracing::error!(query, error = %e, "Summary completion failed"))?;

        let draft = parse_summary(&content)
            .inspect_err(|e| tracing::error!(query, error = %e, "Summary reply rejected"))?;

        tracing::info!(query, documents = documents.len(), model = %self.model, "Summary generated");
        Ok(draft.finish(documents, self.model.clone()))
    }

    async fn sub_topics(&self, query: &str, documents: &[Document]) -> ClientResult<Vec<SubTopic>> {
        let prompt = sub_topic_prompt(query, documents);
        let content = self
            .complete(
                SUBTOPIC_SYSTEM_PROMPT,
                &prompt,
                llm::SUBTOPIC_TEMPERATURE,
                llm::SUBTOPIC_MAX_TOKENS,
            )
            .await
            .inspect_err(|e| tracing::error!(query, error = %e, "Sub-topic completion failed"))?;

        let topics = parse_sub_topics(&content, documents.len())
            .inspect_err(|e| tracing::error!(query, error = %e, "Sub-topic reply rejected"))?;

        tracing::info!(query, sub_topics = topics.len(), "Sub-topics generated");
        Ok(topics)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}
