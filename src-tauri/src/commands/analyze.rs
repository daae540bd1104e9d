//! Tauri command for craft photo analysis.
//!
//! Decodes the uploaded payload, normalizes it, loads the stored API key
//! (checked before any network activity), calls Gemini and shapes the
//! result for rendering.

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{self, CraftAnalysis};
use crate::credential;
use crate::error::{AnalysisError, ErrorPayload};

/// Request payload from the frontend uploader.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image data, data-URL prefix already stripped
    pub image_base64: String,
    /// MIME type declared by the selected file
    pub mime_type: String,
}

/// Analysis result shaped for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub craft_type: String,
    pub suggestions: Vec<SuggestionDisplay>,
}

/// One suggestion with its outbound search link precomputed.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionDisplay {
    pub id: String,
    pub title: String,
    pub description: String,
    pub search_query: String,
    pub category: String,
    /// Pinterest search URL with the query percent-encoded
    pub search_url: String,
}

/// Analyze a craft photo and return Pinterest search suggestions.
#[tauri::command]
pub async fn analyze_craft(request: AnalyzeRequest) -> Result<AnalyzeResponse, ErrorPayload> {
    info!("Starting craft analysis ({})", request.mime_type);

    if !request.mime_type.starts_with("image/") {
        return Err(AnalysisError::InvalidImage(format!(
            "Unsupported file type: {}",
            request.mime_type
        ))
        .into());
    }

    let image_bytes = base64::engine::general_purpose::STANDARD
        .decode(&request.image_base64)
        .map_err(|e| AnalysisError::InvalidImage(format!("Invalid base64 image data: {}", e)))?;

    let payload = analysis::prepare_image(&image_bytes)?;

    // Credential check happens here, before any network activity. An
    // expired key reads as absent and sends the user back to the gate.
    let api_key = match credential::load() {
        Some(key) => key,
        None => {
            warn!("Analysis requested without a usable API key");
            return Err(AnalysisError::MissingCredential.into());
        }
    };

    let result = analysis::analyze(&api_key, &payload, analysis::image_media_type()).await?;

    info!(
        "Analysis complete: '{}' with {} suggestions",
        result.craft_type,
        result.suggestions.len()
    );
    Ok(format_response(result))
}

/// Map the wire result into display structs, deriving each card's link.
fn format_response(analysis: CraftAnalysis) -> AnalyzeResponse {
    let suggestions = analysis
        .suggestions
        .into_iter()
        .map(|s| {
            let search_url = s.pinterest_url();
            SuggestionDisplay {
                id: s.id,
                title: s.title,
                description: s.description,
                search_query: s.search_query,
                category: s.category,
                search_url,
            }
        })
        .collect();

    AnalyzeResponse {
        craft_type: analysis.craft_type,
        suggestions,
    }
}
