//! Client for a remote emotion classifier service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{Classifier, LabelScore};
use crate::config::ClassifierConfig;
use crate::errors::{ConfigError, MoodlensError, Result};

#[derive(Deserialize)]
struct ClassifyPayload {
    #[serde(default)]
    results: Vec<LabelScore>,
}

/// [`Classifier`] that POSTs `{"text": ...}` to `{base_url}/classify`.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    base_url: String,
    client: Client,
}

impl HttpClassifier {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Creates a client from config. Fails if no endpoint is configured.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::new("classifier.base_url", "no endpoint configured"))?;
        Self::new(base_url, config.timeout())
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let resp = self
            .client
            .post(format!("{}/classify", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MoodlensError::Http(format!("classifier returned {status}")));
        }
        let body = resp.text().await?;
        let payload: ClassifyPayload = serde_json::from_str(&body)
            .map_err(|e| MoodlensError::Classification(format!("unparsable response: {e}")))?;
        Ok(payload.results)
    }
}
