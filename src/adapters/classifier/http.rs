//! HTTP implementation of the semantic classifier
//!
//! Speaks to a rate-limited JSON-over-HTTP service. All transport and
//! status failures are mapped onto [`ClassifierError`] at this boundary;
//! nothing reqwest-specific escapes. Response bodies are parsed
//! permissively via [`super::parse`], so a 200 with garbage in it yields
//! an empty result rather than an error.

use super::{parse, LabeledPhrase, SemanticClassifier};
use crate::config::ClassifierConfig;
use crate::domain::{BlackoutError, ClassifierError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// HTTP semantic classifier client
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<crate::config::SecretString>,
}

impl HttpClassifier {
    /// Build a client from configuration
    pub fn new(config: &ClassifierConfig) -> crate::domain::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                BlackoutError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn call(
        &self,
        text: &str,
        required_categories: &[String],
        response_format: &str,
    ) -> std::result::Result<String, ClassifierError> {
        let mut request = self.client.post(&self.endpoint).json(&serde_json::json!({
            "text": text,
            "required_categories": required_categories,
            "response_format": response_format,
        }));

        if let Some(ref key) = self.api_key {
            request = request.header(
                "Authorization",
                format!("Bearer {}", key.expose_secret().as_ref()),
            );
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout(e.to_string())
            } else {
                ClassifierError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        match status {
            s if s.is_success() => response
                .text()
                .await
                .map_err(|e| ClassifierError::InvalidResponse(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unspecified")
                    .to_string();
                Err(ClassifierError::RateLimited(retry_after))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ClassifierError::AuthenticationFailed(format!(
                    "status {status}"
                )))
            }
            s if s.is_client_error() => {
                let message = response.text().await.unwrap_or_default();
                Err(ClassifierError::ClientError {
                    status: s.as_u16(),
                    message,
                })
            }
            s => {
                let message = response.text().await.unwrap_or_default();
                Err(ClassifierError::ServerError {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl SemanticClassifier for HttpClassifier {
    async fn forbidden_phrases(
        &self,
        text: &str,
        required_categories: &[String],
    ) -> std::result::Result<Vec<String>, ClassifierError> {
        let body = self.call(text, required_categories, "phrases").await?;
        let phrases = parse::extract_phrases(&body);
        tracing::debug!(count = phrases.len(), "Classifier returned phrases");
        Ok(phrases)
    }

    async fn classify_entities(
        &self,
        text: &str,
        required_categories: &[String],
    ) -> std::result::Result<Vec<LabeledPhrase>, ClassifierError> {
        let body = self.call(text, required_categories, "entities").await?;
        let labeled = parse::extract_labeled(&body);
        tracing::debug!(count = labeled.len(), "Classifier returned labeled entities");
        Ok(labeled)
    }
}
