//! Learning plan generator, the total entry point for plan generation.
//!
//! Flow: build prompt, one provider call, parse and validate, return.
//! Any failure along the way is logged and answered with the fallback plan,
//! so `generate_plan` always produces a usable curriculum.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LlmSettings;
use crate::learning_plan::fallback::fallback_plan;
use crate::learning_plan::models::{LearningPlanRequest, PlanStructure};
use crate::learning_plan::parser::{parse_plan, PlanParseError};
use crate::learning_plan::prompts::build_plan_prompt;
use crate::llm_client::{build_generator, LlmError, ProviderKind, TextGenerator};

#[derive(Debug, Error)]
enum GenerationError {
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("unusable provider response: {0}")]
    Parse(#[from] PlanParseError),
}

/// Holds the provider chosen at startup. Cheap to clone.
#[derive(Clone)]
pub struct PlanGenerator {
    kind: ProviderKind,
    provider: Option<Arc<dyn TextGenerator>>,
}

impl PlanGenerator {
    pub fn new(kind: ProviderKind, provider: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { kind, provider }
    }

    /// Selects and builds the provider from configuration.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let kind = ProviderKind::select(settings);
        let provider = build_generator(kind, settings)?;
        Ok(Self::new(kind, provider))
    }

    /// The deterministic strategy: always the fallback plan, no I/O.
    #[cfg(test)]
    pub fn mock() -> Self {
        Self::new(ProviderKind::Mock, None)
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model())
    }

    pub async fn generate_plan(&self, request: &LearningPlanRequest) -> PlanStructure {
        let Some(provider) = self.provider.as_deref() else {
            debug!("No generation provider configured; serving fallback plan");
            return fallback_plan(&request.career_goal);
        };

        match self.try_generate(provider, request).await {
            Ok(plan) => {
                info!(
                    "Generated plan via {} ({} modules, {} lessons)",
                    self.kind.as_str(),
                    plan.modules.len(),
                    plan.lesson_count()
                );
                plan
            }
            Err(e) => {
                warn!(
                    "Plan generation via {} failed, using fallback plan: {e}",
                    self.kind.as_str()
                );
                fallback_plan(&request.career_goal)
            }
        }
    }

    async fn try_generate(
        &self,
        provider: &dyn TextGenerator,
        request: &LearningPlanRequest,
    ) -> Result<PlanStructure, GenerationError> {
        let prompt = build_plan_prompt(request);
        let text = provider.generate(&prompt).await?;
        Ok(parse_plan(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::learning_plan::fallback::GOAL_DISPLAY_LIMIT;
    use crate::llm_client::anthropic::AnthropicProvider;

    /// Returns a fixed reply and counts calls.
    struct CannedGenerator {
        reply: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn model(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn generator_with(provider: Arc<CannedGenerator>) -> PlanGenerator {
        PlanGenerator::new(ProviderKind::Anthropic, Some(provider))
    }

    fn provider_plan() -> serde_json::Value {
        json!({
            "title": "Personalized Learning Plan for Mobile Developer",
            "summary": "Swift and Kotlin",
            "modules": [{
                "title": "iOS",
                "description": "Swift basics",
                "lessons": [{
                    "title": "SwiftUI",
                    "description": "Views",
                    "duration": "90",
                    "difficulty": "beginner",
                    "resources": ["Apple docs"]
                }]
            }]
        })
    }

    fn assert_is_fallback(plan: &PlanStructure, goal: &str) {
        assert_eq!(plan, &fallback_plan(goal));
        assert!(!plan.modules.is_empty());
    }

    #[tokio::test]
    async fn test_mock_strategy_returns_fallback_without_io() {
        let generator = PlanGenerator::mock();
        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Mobile Developer"))
            .await;
        assert_is_fallback(&plan, "Mobile Developer");
        assert!(generator.model().is_none());
    }

    #[tokio::test]
    async fn test_mock_strategy_is_idempotent() {
        let generator = PlanGenerator::from_settings(&LlmSettings::default()).unwrap();
        assert_eq!(generator.provider_kind(), ProviderKind::Mock);

        let request = LearningPlanRequest::new("QA Engineer");
        let first = generator.generate_plan(&request).await;
        let second = generator.generate_plan(&request).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_provider_plan_is_returned_when_valid() {
        let reply = format!("Here is your plan: {} Hope that helps!", provider_plan());
        let provider = CannedGenerator::replying(&reply);
        let generator = generator_with(provider.clone());

        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Mobile Developer"))
            .await;

        assert_eq!(plan.title, "Personalized Learning Plan for Mobile Developer");
        assert_eq!(plan.modules[0].lessons[0].title, "SwiftUI");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failure_falls_back_with_truncated_goal() {
        let goal = "Senior Machine Learning Infrastructure Engineer at a robotics startup";
        let provider = CannedGenerator::failing(503);
        let generator = generator_with(provider.clone());

        let plan = generator.generate_plan(&LearningPlanRequest::new(goal)).await;

        assert_is_fallback(&plan, goal);
        let shown: String = goal.chars().take(GOAL_DISPLAY_LIMIT).collect();
        assert_eq!(plan.title, format!("Personalized Learning Plan for {shown}"));
        // no retries
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reply_without_braces_falls_back() {
        let generator = generator_with(CannedGenerator::replying(
            "Sorry, I cannot produce a plan right now.",
        ));
        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Writer"))
            .await;
        assert_is_fallback(&plan, "Writer");
    }

    #[tokio::test]
    async fn test_structurally_wrong_json_falls_back() {
        let generator = generator_with(CannedGenerator::replying(
            r#"{"plan": "just read a lot of books"}"#,
        ));
        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Editor"))
            .await;
        assert_is_fallback(&plan, "Editor");
    }

    #[tokio::test]
    async fn test_every_request_shape_yields_modules() {
        let generators = [
            PlanGenerator::mock(),
            generator_with(CannedGenerator::failing(500)),
            generator_with(CannedGenerator::replying("{ not json")),
            generator_with(CannedGenerator::replying(&provider_plan().to_string())),
        ];
        let requests = [
            LearningPlanRequest::new(""),
            LearningPlanRequest::new("DevOps"),
            LearningPlanRequest {
                career_goal: "Security analyst".into(),
                resume_text: Some("".into()),
                current_role: Some("Helpdesk".into()),
                target_role: None,
            },
        ];

        for generator in &generators {
            for request in &requests {
                let plan = generator.generate_plan(request).await;
                assert!(!plan.modules.is_empty());
                assert!(!plan.title.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_http_provider_error_falls_back_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("k".into(), "m".into())
            .unwrap()
            .with_api_base(server.uri());
        let generator = PlanGenerator::new(ProviderKind::Anthropic, Some(Arc::new(provider)));

        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Cloud Engineer"))
            .await;
        assert_is_fallback(&plan, "Cloud Engineer");
    }

    #[tokio::test]
    async fn test_http_provider_success_end_to_end() {
        let server = MockServer::start().await;
        let text = format!("```json\n{}\n```", provider_plan());

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": text}],
                "usage": {"input_tokens": 900, "output_tokens": 300}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("k".into(), "m".into())
            .unwrap()
            .with_api_base(server.uri());
        let generator = PlanGenerator::new(ProviderKind::Anthropic, Some(Arc::new(provider)));

        let plan = generator
            .generate_plan(&LearningPlanRequest::new("Mobile Developer"))
            .await;
        assert_eq!(plan.modules[0].title, "iOS");
        assert_eq!(generator.model(), Some("m"));
    }
}
