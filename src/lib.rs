pub mod actions;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod parse;
pub mod prompt;
pub mod transport;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{AssistantError, CallPath, Result};
use crate::models::{ChatMessage, DiagnosisResult, GenerateContentRequest, UserContext};
use crate::transport::{GeminiTransport, Transport};

/// Entry point for the UI layer: symptom analysis and health chat.
///
/// Both calls fold every provider or parsing failure into a renderable result.
/// The one exception is a missing API key on [`HealthAssistant::analyze_symptoms`],
/// which is returned as [`AssistantError::ConfigurationMissing`]; chat reports the
/// same condition as an assistant message instead.
#[derive(Clone)]
pub struct HealthAssistant {
    transport: Option<Arc<dyn Transport>>,
}

impl HealthAssistant {
    pub fn new(cfg: &Config) -> Self {
        match GeminiTransport::new(cfg.gemini.clone()) {
            Ok(transport) => {
                tracing::info!(model = %transport.model(), "Gemini transport ready");
                Self::with_transport(Arc::new(transport))
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::unconfigured()
            }
        }
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn unconfigured() -> Self {
        Self { transport: None }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn analyze_symptoms(
        &self,
        symptoms: &str,
        image_base64: Option<&str>,
    ) -> Result<DiagnosisResult> {
        let transport = self
            .transport
            .as_deref()
            .ok_or(AssistantError::ConfigurationMissing)?;

        tracing::info!(
            has_image = image_base64.is_some(),
            "[AI] Requesting analysis for: {}",
            if symptoms.trim().is_empty() { "Image only" } else { symptoms }
        );

        let request = prompt::diagnosis_request(symptoms, image_base64);
        match diagnose(transport, &request).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(classify::diagnosis_fallback(&e)),
        }
    }

    pub async fn send_message(&self, text: &str, context: Option<&UserContext>) -> ChatMessage {
        let Some(transport) = self.transport.as_deref() else {
            return classify::chat_fallback(&AssistantError::ConfigurationMissing);
        };

        tracing::info!("[AI] Chat message received ({} chars)", text.chars().count());

        let request = prompt::chat_request(text, context);
        match chat(transport, &request).await {
            Ok(reply) => {
                let actions = actions::infer_actions(&reply);
                ChatMessage::ai(reply).with_actions(actions)
            }
            Err(e) => classify::chat_fallback(&e),
        }
    }
}

async fn diagnose(tx: &dyn Transport, req: &GenerateContentRequest) -> Result<DiagnosisResult> {
    let resp = tx.generate(req).await?;
    let text = extract::extract(&resp).into_text(CallPath::Diagnosis)?;
    parse::parse_diagnosis(&text)
}

async fn chat(tx: &dyn Transport, req: &GenerateContentRequest) -> Result<String> {
    let resp = tx.generate(req).await?;
    extract::extract(&resp).into_text(CallPath::Chat)
}
