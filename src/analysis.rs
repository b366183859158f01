//! AI-assisted summarization of free-text feedback.
//!
//! The analyzer is an external collaborator behind a trait seam. Failures
//! never reach the caller: every outcome is a report, degrading to a neutral
//! placeholder when the provider misbehaves or is not configured.

use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use crate::models::{AnswerValue, Question, QuestionType, SurveyResponse};
use crate::names;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// A keyword/weight pair for the dashboard tag cloud. Weights run 1..=100.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagCloudItem {
    pub text: String,
    pub value: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub summary: String,
    pub sentiment: Sentiment,
    pub tags: Vec<TagCloudItem>,
}

impl FeedbackReport {
    pub fn fallback(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            sentiment: Sentiment::Neutral,
            tags: Vec::new(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackAnalyzer: Send + Sync {
    /// Whether a provider is configured at all.
    fn is_enabled(&self) -> bool;

    async fn analyze(&self, snippets: &[String]) -> Result<FeedbackReport>;
}

/// Pull the analyzable lines out of the responses: free-text answers with
/// the respondent's overall score for context, and multi-choice
/// dissatisfaction selections as keyword lines. Bounded to the most recent
/// lines so the prompt cannot grow without limit.
pub fn collect_snippets(responses: &[SurveyResponse], schema: &[Question]) -> Vec<String> {
    let overall_id = schema
        .iter()
        .rev()
        .find(|q| q.kind == QuestionType::Rating)
        .map(|q| q.id.as_str());

    let mut snippets = Vec::new();
    for response in responses {
        let score = overall_id
            .and_then(|id| response.answers.get(id))
            .and_then(AnswerValue::canonical)
            .unwrap_or_else(|| "N/A".to_string());

        for question in schema {
            match (question.kind, response.answers.get(&question.id)) {
                (QuestionType::Text, Some(AnswerValue::Text(text))) if !text.trim().is_empty() => {
                    snippets.push(format!("Score: {score}, Comment: \"{}\"", text.trim()));
                }
                (QuestionType::MultipleChoice, Some(AnswerValue::List(items)))
                    if !items.is_empty() =>
                {
                    snippets.push(format!("Dissatisfaction reason: {}", items.join(", ")));
                }
                _ => {}
            }
        }
    }

    let excess = snippets.len().saturating_sub(names::ANALYSIS_SAMPLE_SIZE);
    snippets.split_off(excess)
}

fn build_prompt(snippets: &[String]) -> String {
    format!(
        "Analyze the following restaurant customer feedback.\n\
         Focus on extracting common reasons for dissatisfaction (especially for scores <= 8).\n\n\
         Feedback Data:\n{}\n\n\
         Return a JSON object with:\n\
         1. summary: A 2-sentence executive summary.\n\
         2. sentiment: Overall sentiment (positive/neutral/negative).\n\
         3. tags: Top 10 negative/improvement keywords with frequency score (1-100).",
        snippets.join("\n")
    )
}

// --- Gemini request/response wire structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

fn report_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "sentiment": { "type": "STRING", "enum": ["positive", "neutral", "negative"] },
            "tags": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "value": { "type": "INTEGER" }
                    },
                    "required": ["text", "value"]
                }
            }
        },
        "required": ["summary", "sentiment", "tags"]
    })
}

/// Calls the Gemini `generateContent` endpoint in JSON response mode.
#[derive(Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiAnalyzer {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl FeedbackAnalyzer for GeminiAnalyzer {
    fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn analyze(&self, snippets: &[String]) -> Result<FeedbackReport> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(snippets),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: report_schema(),
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            color_eyre::eyre::bail!("analysis API returned {status}: {text}");
        }

        let body: GeminiResponse = response.json().await?;
        let raw = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        Ok(serde_json::from_str(raw)?)
    }
}

/// Result of asking for an analysis run.
pub enum AnalysisOutcome {
    Report(FeedbackReport),
    /// An earlier run is still in flight; this request was refused, not
    /// queued behind it.
    Busy,
}

#[derive(Clone)]
pub struct AnalysisService {
    analyzer: Arc<dyn FeedbackAnalyzer>,
    gate: Arc<Mutex<()>>,
}

impl AnalysisService {
    pub fn new(analyzer: Arc<dyn FeedbackAnalyzer>) -> Self {
        Self {
            analyzer,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn gemini(api_url: String, api_key: String) -> Self {
        Self::new(Arc::new(GeminiAnalyzer::new(api_url, api_key)))
    }

    /// Run one analysis. At most one request is in flight at a time; any
    /// provider failure degrades to a neutral placeholder report.
    pub async fn run(&self, responses: &[SurveyResponse], schema: &[Question]) -> AnalysisOutcome {
        let Ok(_guard) = self.gate.try_lock() else {
            return AnalysisOutcome::Busy;
        };

        if !self.analyzer.is_enabled() {
            return AnalysisOutcome::Report(FeedbackReport::fallback(
                "AI analysis is not configured.",
            ));
        }

        let snippets = collect_snippets(responses, schema);
        if snippets.is_empty() {
            return AnalysisOutcome::Report(FeedbackReport::fallback("No data available."));
        }

        match self.analyzer.analyze(&snippets).await {
            Ok(report) => AnalysisOutcome::Report(report),
            Err(e) => {
                tracing::error!("feedback analysis failed: {e}");
                AnalysisOutcome::Report(FeedbackReport::fallback(
                    "Could not perform AI analysis at this time.",
                ))
            }
        }
    }
}
