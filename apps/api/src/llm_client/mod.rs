/// LLM client: every outbound text-generation call in the service goes through here.
///
/// One `TextGenerator` implementation per provider. The active provider is chosen
/// once at startup from `LlmSettings` and injected into the plan generator as an
/// `Arc<dyn TextGenerator>`; nothing re-reads the environment per request.
///
/// Calls are made exactly once. There is no retry or backoff: callers treat any
/// `LlmError` as a signal to fall back.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::LlmSettings;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod prompts;

use anthropic::AnthropicProvider;
use gemini::GeminiProvider;
use ollama::OllamaProvider;
use openai::OpenAiProvider;

/// Upper bound on a single cloud provider call.
pub const CLOUD_TIMEOUT: Duration = Duration::from_secs(120);
/// Local models are slower to produce a full plan.
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(300);
pub const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response envelope: {0}")]
    Envelope(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("{provider} selected without an API key")]
    MissingCredential { provider: &'static str },
}

/// Send a prompt, get back unstructured text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Which generation strategy the process runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    Anthropic,
    OpenAi,
    Google,
    Mock,
}

impl ProviderKind {
    /// Fixed priority: local runner flag, then Anthropic, OpenAI, Google.
    /// With nothing configured the mock strategy is selected; this never fails.
    pub fn select(settings: &LlmSettings) -> Self {
        if settings.use_ollama {
            ProviderKind::Ollama
        } else if settings.anthropic_api_key.is_some() {
            ProviderKind::Anthropic
        } else if settings.openai_api_key.is_some() {
            ProviderKind::OpenAi
        } else if settings.google_api_key.is_some() {
            ProviderKind::Google
        } else {
            ProviderKind::Mock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Google => "google",
            ProviderKind::Mock => "mock",
        }
    }
}

/// Builds the provider for `kind`. `Mock` has no backing provider.
pub fn build_generator(
    kind: ProviderKind,
    settings: &LlmSettings,
) -> Result<Option<Arc<dyn TextGenerator>>, LlmError> {
    let generator: Arc<dyn TextGenerator> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            settings.ollama_url.clone(),
            settings.ollama_model.clone(),
        )?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
            credential(kind, &settings.anthropic_api_key)?,
            settings.anthropic_model.clone(),
        )?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            credential(kind, &settings.openai_api_key)?,
            settings.openai_model.clone(),
        )?),
        ProviderKind::Google => Arc::new(GeminiProvider::new(
            credential(kind, &settings.google_api_key)?,
            settings.google_model.clone(),
        )?),
        ProviderKind::Mock => return Ok(None),
    };
    Ok(Some(generator))
}

fn credential(kind: ProviderKind, key: &Option<String>) -> Result<String, LlmError> {
    key.clone().ok_or(LlmError::MissingCredential {
        provider: kind.as_str(),
    })
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Maps non-2xx responses to `LlmError::Api` and decodes the JSON body otherwise.
pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| LlmError::Envelope(e.to_string()))
}

/// Rejects missing or whitespace-only generations.
pub(crate) fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(LlmError::EmptyContent),
    }
}
