//! The Gemini generateContent call with schema-constrained JSON output.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::prompts::{build_curator_prompt, craft_analysis_response_schema};
use super::types::CraftAnalysis;
use crate::error::AnalysisError;

/// Model used for craft analysis.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Moderate sampling temperature, favoring some variety over determinism.
const TEMPERATURE: f64 = 0.7;

/// Analyze a craft photo and return the parsed suggestion set.
///
/// The credential is checked before any network activity. One request per
/// invocation, never retried; concurrent calls are not deduplicated here.
pub async fn analyze(
    api_key: &str,
    base64_image: &str,
    mime_type: &str,
) -> Result<CraftAnalysis, AnalysisError> {
    if api_key.is_empty() {
        return Err(AnalysisError::MissingCredential);
    }

    let client = build_api_client()?;
    let url = format!("{}/{}:generateContent", API_BASE, GEMINI_MODEL);
    let body = GeminiRequest::for_image(base64_image, mime_type);

    info!("Requesting craft analysis from {}", GEMINI_MODEL);
    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            let err = if e.is_timeout() {
                AnalysisError::NetworkFailure("Gemini request timed out after 60s".to_string())
            } else {
                AnalysisError::NetworkFailure(e.to_string())
            };
            error!("{}", err);
            err
        })?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        return Err(classify_http_error(status.as_u16(), &body_text));
    }

    let wrapper: GeminiResponse = response.json().await.map_err(|e| {
        let err = AnalysisError::SchemaMismatch(format!(
            "Failed to parse Gemini response wrapper: {}",
            e
        ));
        error!("{}", err);
        err
    })?;

    let text = wrapper.response_text().ok_or_else(|| {
        let err = AnalysisError::SchemaMismatch("No text content in Gemini response".to_string());
        error!("{}", err);
        err
    })?;

    parse_analysis_text(&text)
}

/// Parse the model's JSON text into a typed result, assigning index-derived
/// fallback ids to suggestions that came back without one.
pub fn parse_analysis_text(text: &str) -> Result<CraftAnalysis, AnalysisError> {
    let mut analysis: CraftAnalysis = serde_json::from_str(text).map_err(|e| {
        let truncated: String = text.chars().take(500).collect();
        let err = AnalysisError::SchemaMismatch(format!(
            "Response JSON does not match the expected shape: {}. Raw response (first 500 chars): {}",
            e, truncated
        ));
        error!("{}", err);
        err
    })?;

    analysis.assign_missing_ids();
    Ok(analysis)
}

/// Build a reqwest client with the 60-second timeout used for model calls.
fn build_api_client() -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| AnalysisError::Unknown(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-2xx Gemini status to a typed error. Gemini reports an invalid
/// key as 400 INVALID_ARGUMENT, not just 401/403.
fn classify_http_error(status: u16, body: &str) -> AnalysisError {
    let truncated: String = body.chars().take(1024).collect();
    let err = match status {
        400 | 401 | 403 => AnalysisError::CredentialRejected(format!(
            "Gemini returned {}: {}",
            status, truncated
        )),
        _ => AnalysisError::Unknown(format!("Gemini API error {}: {}", status, truncated)),
    };
    error!("{}", err);
    err
}

// Request/response wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request, either inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
    temperature: f64,
}

impl GeminiRequest {
    /// One content with the image first and the curator prompt after it,
    /// plus the declared output schema.
    fn for_image(base64_image: &str, mime_type: &str) -> Self {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiRequestPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_image.to_string(),
                        },
                    },
                    GeminiRequestPart::Text {
                        text: build_curator_prompt(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: craft_analysis_response_schema(),
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts, if any.
    fn response_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
