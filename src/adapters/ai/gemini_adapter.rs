//! Google Gemini adapter for rephrasing and conversation starters.
//!
//! Calls the `generateContent` REST endpoint. The API key travels in the
//! `x-goog-api-key` header, never in the URL.

use crate::domain::{DomainError, ToneLabel};
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

/// Gemini adapter.
pub struct GeminiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `api_url` - API base (e.g., "https://generativelanguage.googleapis.com/v1beta")
    /// * `api_key` - Google AI Studio key
    /// * `model` - Model name, with or without the `models/` prefix
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/models/{}:generateContent", self.api_url, model)
    }

    fn rephrase_prompt(original: &str, label: &ToneLabel) -> String {
        format!(
            r#"System: You are a message rephrasing engine. Your ONLY purpose is to rewrite the input message to strictly match the target demographic tone.
- Do NOT output quotes.
- Do NOT output introductory text like "Here is the message".
- Output ONLY the rewritten text.

Input Message: "{}"
Target Demographic: "{}""#,
            original, label
        )
    }

    fn starter_prompt(bio: &str) -> String {
        format!(
            r#"System: You write a single opening line for starting a conversation with someone, based on their social media biography.
- Reference something specific from the biography.
- Keep it to one or two friendly sentences.
- Do NOT output quotes or any text other than the opening line.

Biography: "{}""#,
            bio
        )
    }

    /// Normalize model output: trim, drop markdown fences and wrapping quotes.
    fn clean_reply(raw: &str) -> String {
        let mut text = raw.trim();

        if let Some(rest) = text.strip_prefix("```") {
            let rest = rest.strip_prefix("text").unwrap_or(rest);
            text = rest.strip_suffix("```").unwrap_or(rest).trim();
        }

        for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')] {
            if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
                let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];
                if !inner.contains(open) && !inner.contains(close) {
                    text = inner.trim();
                }
                break;
            }
        }

        text.to_string()
    }

    async fn generate(&self, prompt: String, temperature: f32) -> Result<String, DomainError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(DomainError::Ai(err.message));
        }

        let raw = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        let text = Self::clean_reply(&raw);
        if text.is_empty() {
            return Err(DomainError::Ai("No response from Gemini".to_string()));
        }
        debug!(raw_len = raw.len(), "received Gemini response");
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait::async_trait]
impl AiPort for GeminiAdapter {
    async fn rephrase(&self, original: &str, label: &ToneLabel) -> Result<String, DomainError> {
        info!(label = %label, len = original.len(), "rephrasing draft");
        self.generate(Self::rephrase_prompt(original, label), 0.7)
            .await
    }

    async fn conversation_starter(&self, bio: &str) -> Result<String, DomainError> {
        info!(bio_len = bio.len(), "generating conversation starter");
        self.generate(Self::starter_prompt(bio), 0.9).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(url: &str) -> GeminiAdapter {
        GeminiAdapter::new(
            url.to_string(),
            "test-key".to_string(),
            DEFAULT_GEMINI_MODEL.to_string(),
        )
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn test_clean_reply_plain() {
        assert_eq!(GeminiAdapter::clean_reply("  Hi there \n"), "Hi there");
    }

    #[test]
    fn test_clean_reply_strips_quotes() {
        assert_eq!(GeminiAdapter::clean_reply("\"Hi there\""), "Hi there");
        assert_eq!(
            GeminiAdapter::clean_reply("\u{201c}Hi there\u{201d}"),
            "Hi there"
        );
    }

    #[test]
    fn test_clean_reply_keeps_inner_quotes() {
        let raw = "\"Hi\" and \"bye\"";
        assert_eq!(GeminiAdapter::clean_reply(raw), raw);
    }

    #[test]
    fn test_clean_reply_strips_fence() {
        assert_eq!(GeminiAdapter::clean_reply("```\nHello team\n```"), "Hello team");
    }

    #[test]
    fn test_endpoint_accepts_prefixed_model() {
        let a = GeminiAdapter::new(
            "https://x.test/v1beta/".into(),
            "k".into(),
            "models/gemini-pro".into(),
        );
        assert_eq!(
            a.endpoint(),
            "https://x.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_rephrase_prompt_names_tone() {
        let prompt = GeminiAdapter::rephrase_prompt("see you soon", &ToneLabel::new("Formal"));
        assert!(prompt.contains("Input Message: \"see you soon\""));
        assert!(prompt.contains("Target Demographic: \"Formal\""));
    }

    #[tokio::test]
    async fn test_rephrase_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-flash-latest:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("\"Good evening.\"")))
            .expect(1)
            .mount(&server)
            .await;

        let text = adapter(&server.uri())
            .rephrase("hey", &ToneLabel::new("Formal"))
            .await
            .unwrap();
        assert_eq!(text, "Good evening.");
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = adapter(&server.uri())
            .rephrase("hey", &ToneLabel::new("Casual"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Ai(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        assert!(
            adapter(&server.uri())
                .conversation_starter("loves hiking")
                .await
                .is_err()
        );
    }
}
