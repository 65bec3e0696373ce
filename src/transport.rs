use async_trait::async_trait;
use reqwest::Client;

use crate::config::GeminiConfig;
use crate::error::{AssistantError, Result};
use crate::models::{GenerateContentRequest, GenerateContentResponse, ModelInfo, ModelList};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, req: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

/// One POST per call. No retry, no explicit timeout: reqwest's defaults apply.
pub struct GeminiTransport {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(AssistantError::ConfigurationMissing)?;
        Ok(Self {
            client: Client::new(),
            config,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Lists the models visible to this key. Used for connectivity checks only.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.config.models_url(&self.api_key))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let list: ModelList = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "Gemini models.list failed");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message: list.error.and_then(|e| e.message),
            });
        }

        list.models.ok_or_else(|| {
            AssistantError::Internal(format!("models.list returned no models: {body}"))
        })
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(&self, req: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.config.generate_url(&self.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_reply(status.as_u16(), &body)
    }
}

/// Body is decoded before the status check so provider error details survive
/// non-2xx replies.
pub(crate) fn decode_reply(status: u16, body: &str) -> Result<GenerateContentResponse> {
    let parsed = serde_json::from_str::<GenerateContentResponse>(body);

    if !(200..300).contains(&status) {
        tracing::error!(status, body = %body, "Gemini API error response");
        let message = parsed
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty());
        return Err(AssistantError::Api { status, message });
    }

    parsed.map_err(|e| {
        AssistantError::Internal(format!("Failed to parse Gemini API response: {e}"))
    })
}
