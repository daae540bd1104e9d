//! Prompt and response schema for the Pinterest curator call.

use serde_json;

/// Return the response schema declared with every generateContent request.
/// Gemini structured output guarantees JSON conforming to this shape, so
/// the response text parses straight into `CraftAnalysis`.
///
/// Gemini schema types are uppercase (OBJECT, ARRAY, STRING).
pub fn craft_analysis_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "craftType": {
                "type": "STRING",
                "description": "The specific craft technique identified (e.g. 'Macrame', 'Watercolor', 'Amigurumi')."
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {
                            "type": "STRING",
                            "description": "A unique short id"
                        },
                        "title": {
                            "type": "STRING",
                            "description": "A catchy title for a Pinterest board"
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Short description of why this is inspiring"
                        },
                        "searchQuery": {
                            "type": "STRING",
                            "description": "Optimized search keywords for Pinterest"
                        },
                        "category": {
                            "type": "STRING",
                            "description": "Category tag (e.g. 'Colors', 'Pattern', 'Style')"
                        }
                    },
                    "required": ["id", "title", "description", "searchQuery", "category"]
                }
            }
        },
        "required": ["craftType", "suggestions"]
    })
}

/// Build the fixed curator instruction. The output language is pinned to
/// Hungarian regardless of the caller's locale.
pub fn build_curator_prompt() -> String {
    r#"Analyze this image of a handmade/craft item.
Your goal is to act as a Pinterest Curator.
1. Identify the specific craft technique and style.
2. Generate 6 distinct ideas for Pinterest searches that would inspire the creator of this item.
3. Suggest searches related to: similar patterns, complementary color palettes, advanced techniques, and styling ideas.
4. Output MUST be in Hungarian (Magyar)."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_top_level_fields() {
        let schema = craft_analysis_response_schema();
        let required = schema["required"].as_array().unwrap();
        let required_strs: Vec<&str> = required.iter().map(|v| v.as_str().unwrap()).collect();

        assert!(required_strs.contains(&"craftType"));
        assert!(required_strs.contains(&"suggestions"));
    }

    #[test]
    fn test_schema_requires_all_suggestion_fields() {
        let schema = craft_analysis_response_schema();
        let required = schema["properties"]["suggestions"]["items"]["required"]
            .as_array()
            .unwrap();
        let required_strs: Vec<&str> = required.iter().map(|v| v.as_str().unwrap()).collect();

        for field in ["id", "title", "description", "searchQuery", "category"] {
            assert!(
                required_strs.contains(&field),
                "Field '{}' should be required",
                field
            );
        }
    }

    #[test]
    fn test_schema_uses_gemini_type_names() {
        let schema = craft_analysis_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["suggestions"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["craftType"]["type"], "STRING");
    }

    #[test]
    fn test_schema_suggestion_fields_all_strings() {
        let schema = craft_analysis_response_schema();
        let properties = schema["properties"]["suggestions"]["items"]["properties"]
            .as_object()
            .unwrap();

        assert_eq!(properties.len(), 5);
        for (name, prop) in properties {
            assert_eq!(prop["type"], "STRING", "Field '{}' should be STRING", name);
        }
    }

    #[test]
    fn test_prompt_pins_language_and_count() {
        let prompt = build_curator_prompt();
        assert!(prompt.contains("Hungarian"));
        assert!(prompt.contains("6 distinct ideas"));
        assert!(prompt.contains("Pinterest Curator"));
    }

    #[test]
    fn test_prompt_covers_all_suggestion_angles() {
        let prompt = build_curator_prompt();
        assert!(prompt.contains("similar patterns"));
        assert!(prompt.contains("complementary color palettes"));
        assert!(prompt.contains("advanced techniques"));
        assert!(prompt.contains("styling ideas"));
    }
}
