//! Response schema declared to the provider and the local check that the
//! returned document actually conforms to it.

use serde_json::{Value, json};

use crate::{
    error::{AnalysisError, Result},
    types::ViralityReport,
};

fn score_component_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "label": { "type": "STRING" },
            "insights": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["score", "label", "insights", "recommendations"]
    })
}

/// Structured-output schema for a [`ViralityReport`], in the provider's
/// OpenAPI subset. Every field is required.
pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallScore": { "type": "NUMBER" },
            "metadataScore": score_component_schema(),
            "thumbnailScore": score_component_schema(),
            "videoScore": score_component_schema(),
            "trendScore": score_component_schema(),
            "timelineIssues": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "timestamp": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "message": { "type": "STRING" },
                        "color": { "type": "STRING" }
                    },
                    "required": ["timestamp", "type", "message", "color"]
                }
            },
            "actionPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "task": { "type": "STRING" },
                        "priority": { "type": "STRING" },
                        "impact": { "type": "STRING" }
                    },
                    "required": ["task", "priority", "impact"]
                }
            },
            "generatedAssets": {
                "type": "OBJECT",
                "properties": {
                    "alternativeTitles": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "descriptionHook": { "type": "STRING" },
                    "optimizedHashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "thumbnailPrompt": { "type": "STRING" }
                },
                "required": [
                    "alternativeTitles",
                    "descriptionHook",
                    "optimizedHashtags",
                    "thumbnailPrompt"
                ]
            }
        },
        "required": [
            "overallScore",
            "metadataScore",
            "thumbnailScore",
            "videoScore",
            "trendScore",
            "timelineIssues",
            "actionPlan",
            "generatedAssets"
        ]
    })
}

// Grounded responses occasionally come back fenced even with a JSON mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Info string (`json`, `JSON`, `jsonc`, ...) runs to the first newline.
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the provider's response text into a report.
///
/// Any missing or mistyped field rejects the whole document; there is no
/// partial report.
pub fn parse_report(text: &str) -> Result<ViralityReport> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let report: ViralityReport = serde_json::from_str(body)?;
    Ok(report)
}
