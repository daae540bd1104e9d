//! Wire types for craft analysis results.
//!
//! Field names mirror the declared response schema, which is camelCase on
//! the wire.

use serde::{Deserialize, Serialize};

/// Base URL for outbound Pinterest searches.
pub const PINTEREST_SEARCH_BASE: &str = "https://www.pinterest.com/search/pins/?q=";

/// One Pinterest search idea produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinterestSuggestion {
    /// Short identifier. The schema requires one, but the model occasionally
    /// returns an empty string; normalized by `assign_missing_ids`.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub search_query: String,
    pub category: String,
}

impl PinterestSuggestion {
    /// Outbound search link for this suggestion, query percent-encoded.
    pub fn pinterest_url(&self) -> String {
        format!(
            "{}{}",
            PINTEREST_SEARCH_BASE,
            urlencoding::encode(&self.search_query)
        )
    }
}

/// Parsed analysis of one craft photo.
///
/// The prompt asks for exactly six suggestions; the count is not enforced
/// here and whatever arrives is rendered as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftAnalysis {
    pub craft_type: String,
    pub suggestions: Vec<PinterestSuggestion>,
}

impl CraftAnalysis {
    /// Give every suggestion a usable id. Index-derived fallbacks keep
    /// rendering keys present and unique within a result.
    pub fn assign_missing_ids(&mut self) {
        for (idx, suggestion) in self.suggestions.iter_mut().enumerate() {
            if suggestion.id.trim().is_empty() {
                suggestion.id = format!("suggestion-{}", idx + 1);
            }
        }
    }
}
