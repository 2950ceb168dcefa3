use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    backend::AnalysisBackend,
    compose::AnalysisRequest,
    error::{AnalysisError, Result},
    provider::ProviderConfig,
    schema::parse_report,
    types::ViralityReport,
};

pub struct GeminiClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// `generateContent` body: search tool on, JSON-only output bound to the
    /// report schema.
    pub fn request_body(request: &AnalysisRequest) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": &request.parts }],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": &request.schema,
            },
        })
    }
}

/// Concatenate the text parts of the first candidate, skipping thought parts.
pub fn extract_candidate_text(response: &Value) -> Result<String> {
    let Some(candidate) = response["candidates"].as_array().and_then(|c| c.first()) else {
        let reason = match response["promptFeedback"]["blockReason"].as_str() {
            Some(block) => format!("prompt blocked: {block}"),
            None => "no candidates in response".to_string(),
        };
        return Err(AnalysisError::InvalidResponse { reason });
    };

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter(|part| !part["thought"].as_bool().unwrap_or(false))
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    Ok(text)
}

#[async_trait]
impl AnalysisBackend for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ViralityReport> {
        let url = self.config.generate_content_url();
        tracing::debug!(model = %self.config.model, mode = ?request.mode, "calling generateContent");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<Value>().await?;
        let text = extract_candidate_text(&payload)?;

        parse_report(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compose::compose, types::VideoMetadata};

    #[test]
    fn body_enables_search_and_json_schema() {
        let metadata = VideoMetadata {
            title: "https://youtu.be/abc123".to_string(),
            ..VideoMetadata::default()
        };
        let body = GeminiClient::request_body(&compose(&metadata, None));

        assert_eq!(body["tools"], json!([{ "google_search": {} }]));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["type"],
            "OBJECT"
        );
        assert!(body["contents"][0]["parts"][0]["text"].is_string());
    }

    #[test]
    fn joins_text_parts_and_skips_thoughts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "{\"a\":" },
                        { "text": "1}" }
                    ]
                }
            }]
        });
        assert_eq!(extract_candidate_text(&response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn missing_candidates_is_invalid() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_candidate_text(&response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn blank_text_is_empty_response() {
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] });
        assert!(matches!(
            extract_candidate_text(&response),
            Err(AnalysisError::EmptyResponse)
        ));
    }
}
