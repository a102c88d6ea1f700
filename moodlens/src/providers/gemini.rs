//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::Generator;
use crate::config::GeminiConfig;
use crate::errors::{ConfigError, MoodlensError, Result};

const FALLBACK_KEYS: [&str; 4] = ["content", "text", "output", "response"];

/// [`Generator`] backed by the Gemini REST API.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client from config. Fails if no API key is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::new("gemini.api_key", "no API key configured"))?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Creates a client against a custom endpoint, e.g. a local proxy.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let config = GeminiConfig {
            api_key: Some(api_key.into()),
            model: model.into(),
            base_url: base_url.into(),
            ..GeminiConfig::default()
        };
        Self::new(&config)
    }

    /// The model this client talks to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(MoodlensError::Http(format!("Gemini returned {status}: {snippet}")));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| MoodlensError::Generation(format!("unparsable Gemini response: {e}")))?;
        extract_response_text(&json)
            .ok_or_else(|| MoodlensError::Generation("no text in Gemini response".to_string()))
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn first_string_key(object: &Value) -> Option<String> {
    FALLBACK_KEYS.iter().find_map(|key| non_empty_str(&object[*key]))
}

/// Pulls the answer text out of a `generateContent` response.
///
/// Tried in order: a top-level `text`; the joined text parts of the first
/// candidate; a string `content`/`text`/`output`/`response` on the first
/// candidate; the same keys at the top level.
#[must_use]
pub fn extract_response_text(json: &Value) -> Option<String> {
    if let Some(text) = non_empty_str(&json["text"]) {
        return Some(text);
    }

    let candidate = json["candidates"].as_array().and_then(|c| c.first());
    if let Some(candidate) = candidate {
        if let Some(parts) = candidate["content"]["parts"].as_array() {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .filter(|t| !t.is_empty())
                .collect();
            let joined = texts.join(" ");
            if !joined.trim().is_empty() {
                return Some(joined.trim().to_string());
            }
        }
        if let Some(text) = first_string_key(candidate) {
            return Some(text);
        }
    }

    first_string_key(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_top_level_text() {
        assert_eq!(
            extract_response_text(&json!({"text": "  hi  "})).as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn test_extract_joins_candidate_parts() {
        let response = json!({
            "candidates": [
                {"content": {"parts": [{"text": "The app"}, {"inlineData": {}}, {"text": "is poor."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        });
        assert_eq!(extract_response_text(&response).as_deref(), Some("The app is poor."));
    }

    #[test]
    fn test_extract_candidate_and_top_level_keys() {
        let candidate_key = json!({"candidates": [{"output": "from candidate"}]});
        assert_eq!(extract_response_text(&candidate_key).as_deref(), Some("from candidate"));

        let top_level = json!({"candidates": [], "response": "from top"});
        assert_eq!(extract_response_text(&top_level).as_deref(), Some("from top"));

        let nothing = json!({"candidates": [{"content": {"parts": []}}], "text": "   "});
        assert_eq!(extract_response_text(&nothing), None);
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = GeminiClient::new(&GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, MoodlensError::Config(ref e) if e.field == "gemini.api_key"));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({"contents": [{"parts": [{"text": "Say hi"}]}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hi!"}], "role": "model"},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-key", "gemini-2.5-flash", server.uri()).unwrap();
        assert_eq!(client.generate("Say hi").await.unwrap(), "Hi!");
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Quota exceeded"}
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-key", "gemini-2.5-flash", server.uri()).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, MoodlensError::Http(_)));
        assert!(err.to_string().contains("429"), "{err}");
    }

    #[tokio::test]
    async fn test_generate_unparsable_and_empty_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let client = GeminiClient::with_base_url("k", "m", server.uri()).unwrap();
        assert!(matches!(client.generate("x").await, Err(MoodlensError::Generation(_))));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;
        let client = GeminiClient::with_base_url("k", "m", format!("{}/", server.uri())).unwrap();
        assert!(matches!(client.generate("x").await, Err(MoodlensError::Generation(_))));
    }
}
