//! Trip planning pipeline
//!
//! Extract a destination, gather its weather and photos, compose the prompt,
//! and walk the model candidate list until one model answers.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::ViajeConfig;
use crate::destination::DestinationExtractor;
use crate::enrichment::{DestinationContext, Enricher};
use crate::models::{PlanRequest, PlanningAnswer};
use crate::prompt::{self, PromptInput};
use crate::providers::{GeminiClient, LanguageModel};
use crate::{Result, ViajeError};

/// Models listed back to the user when no candidate exists
pub const MAX_LISTED_MODELS: usize = 5;

/// Why no model produced an answer. The display text is what the user sees.
#[derive(Error, Debug)]
pub enum InvocationFailure {
    #[error(
        "❌ Error: La API key de Gemini no está configurada. Por favor, crea un archivo .env con tu GEMINI_API_KEY."
    )]
    MissingCredential,

    #[error(
        "❌ Error al comunicarse con Gemini: {source}\n\nPor favor, verifica tu API key e intenta de nuevo."
    )]
    Provider { model: String, source: ViajeError },

    #[error(
        "❌ No se pudo encontrar un modelo compatible de Gemini.\n\nModelos disponibles detectados:\n{}\n\nPor favor, verifica:\n1. Que tu API key sea válida\n2. Que tengas acceso a los modelos de Gemini\n3. Intenta usar uno de los modelos listados arriba",
        format_model_list(.available)
    )]
    NoCompatibleModel { available: Vec<String> },

    #[error(
        "❌ Error: No se pudo conectar con Gemini. Por favor, verifica tu API key y que tengas acceso a los modelos de Gemini."
    )]
    Unreachable,
}

fn format_model_list(models: &[String]) -> String {
    models
        .iter()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tries model identifiers in priority order
pub struct ModelInvoker {
    model: Option<Arc<dyn LanguageModel>>,
    candidates: Vec<String>,
}

impl ModelInvoker {
    pub fn new(model: Option<Arc<dyn LanguageModel>>, candidates: Vec<String>) -> Self {
        Self { model, candidates }
    }

    /// Whether a credential was configured at all
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// First successful generation. A not-found model moves on to the next
    /// candidate; any other failure aborts.
    pub async fn invoke(&self, prompt: &str) -> std::result::Result<String, InvocationFailure> {
        let Some(model) = &self.model else {
            return Err(InvocationFailure::MissingCredential);
        };

        for candidate in &self.candidates {
            match model.generate(candidate, prompt).await {
                Ok(text) => {
                    info!("Answer generated by {}", candidate);
                    return Ok(text);
                }
                Err(e) if e.is_model_not_found() => {
                    info!("Model {} unavailable, trying next candidate", candidate);
                }
                Err(e) => {
                    warn!("Model {} failed: {}", candidate, e);
                    return Err(InvocationFailure::Provider {
                        model: candidate.clone(),
                        source: e,
                    });
                }
            }
        }

        warn!("None of the {} model candidates exist", self.candidates.len());
        match model.list_models().await {
            Ok(mut available) => {
                available.truncate(MAX_LISTED_MODELS);
                Err(InvocationFailure::NoCompatibleModel { available })
            }
            Err(e) => {
                warn!("Listing models failed: {}", e);
                Err(InvocationFailure::Unreachable)
            }
        }
    }
}

/// The planning pipeline behind `POST /api/planificar`
pub struct TripPlanner {
    extractor: DestinationExtractor,
    enricher: Enricher,
    invoker: ModelInvoker,
}

impl TripPlanner {
    pub fn new(extractor: DestinationExtractor, enricher: Enricher, invoker: ModelInvoker) -> Self {
        Self {
            extractor,
            enricher,
            invoker,
        }
    }

    /// Wire the real providers from configuration
    pub fn from_config(config: &ViajeConfig, client: &Client) -> Result<Self> {
        let extractor = DestinationExtractor::from_config(&config.extractor)?;
        let enricher = Enricher::from_config(config, client);

        let model = config.providers.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiClient::new(client.clone(), key, &config.endpoints.gemini))
                as Arc<dyn LanguageModel>
        });
        let invoker = ModelInvoker::new(model, config.models.candidates.clone());

        Ok(Self::new(extractor, enricher, invoker))
    }

    #[must_use]
    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    /// Answer a planning question. Never fails: problems end up as the
    /// answer text.
    #[instrument(skip(self, request), fields(history = request.history.len()))]
    pub async fn plan(&self, request: &PlanRequest) -> PlanningAnswer {
        if !self.invoker.is_configured() {
            return PlanningAnswer::message(InvocationFailure::MissingCredential.to_string());
        }

        let destination = self
            .extractor
            .extract(&request.question, Some(&request.trip_info));

        let context = match &destination {
            Some(place) => self.enricher.destination_context(place).await,
            None => {
                info!("No destination found, answering without enrichment");
                DestinationContext::default()
            }
        };

        let prompt = prompt::compose(&PromptInput {
            question: &request.question,
            trip: &request.trip_info,
            weather_report: context.weather_report.as_deref(),
            history: &request.history,
        });

        match self.invoker.invoke(&prompt).await {
            Ok(answer) => PlanningAnswer {
                answer,
                photos: context.photos,
            },
            Err(failure) => PlanningAnswer::message(failure.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::enrichment::tests::{FakePhotos, FakeWeather};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted model: one outcome per call, recording the models asked for
    pub(crate) struct ScriptedModel {
        outcomes: Mutex<Vec<Result<String>>>,
        listing: Option<Vec<String>>,
        pub calls: Mutex<Vec<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(outcomes: Vec<Result<String>>, listing: Option<Vec<String>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().rev().collect()),
                listing,
                calls: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
            self.calls.lock().unwrap().push(model.to_string());
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ViajeError::ModelNotFound { model: model.to_string() }))
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            self.listing
                .clone()
                .ok_or_else(|| ViajeError::http("scripted", "connection refused"))
        }
    }

    fn candidates() -> Vec<String> {
        ["m1", "m2", "m3", "m4"].into_iter().map(String::from).collect()
    }

    fn not_found(model: &str) -> Result<String> {
        Err(ViajeError::ModelNotFound { model: model.to_string() })
    }

    #[tokio::test]
    async fn test_third_candidate_answers() {
        let model = Arc::new(ScriptedModel::new(
            vec![not_found("m1"), not_found("m2"), Ok("respuesta de m3".to_string())],
            None,
        ));
        let invoker = ModelInvoker::new(Some(model.clone()), candidates());

        let text = invoker.invoke("prompt").await.unwrap();

        assert_eq!(text, "respuesta de m3");
        assert_eq!(*model.calls.lock().unwrap(), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_other_error_aborts_without_trying_more() {
        let model = Arc::new(ScriptedModel::new(
            vec![
                Err(ViajeError::status("gemini", 403, "API key not valid")),
                Ok("never".to_string()),
            ],
            None,
        ));
        let invoker = ModelInvoker::new(Some(model.clone()), candidates());

        let failure = invoker.invoke("prompt").await.unwrap_err();
        let message = failure.to_string();

        assert!(matches!(failure, InvocationFailure::Provider { ref model, .. } if model == "m1"));
        assert!(message.starts_with("❌ Error al comunicarse con Gemini:"));
        assert!(message.contains("API key not valid"));
        assert_eq!(*model.calls.lock().unwrap(), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_exhausted_candidates_list_available_models() {
        let listing: Vec<String> = (1..=8).map(|i| format!("gemini-x{i}")).collect();
        let model = Arc::new(ScriptedModel::new(Vec::new(), Some(listing)));
        let invoker = ModelInvoker::new(Some(model.clone()), candidates());

        let failure = invoker.invoke("prompt").await.unwrap_err();
        let message = failure.to_string();

        assert_eq!(model.calls.lock().unwrap().len(), 4);
        assert!(message.contains("  - gemini-x1\n"));
        assert!(message.contains("  - gemini-x5\n"));
        assert!(!message.contains("gemini-x6"));
    }

    #[tokio::test]
    async fn test_exhausted_candidates_and_listing_failure() {
        let model = Arc::new(ScriptedModel::new(Vec::new(), None));
        let invoker = ModelInvoker::new(Some(model), candidates());

        let failure = invoker.invoke("prompt").await.unwrap_err();
        assert!(matches!(failure, InvocationFailure::Unreachable));
        assert!(failure.to_string().contains("No se pudo conectar con Gemini"));
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let planner = TripPlanner::new(
            DestinationExtractor::from_config(&ExtractorConfig::default()).unwrap(),
            Enricher::new().with_photos(Arc::new(FakePhotos)),
            ModelInvoker::new(None, candidates()),
        );
        let request: PlanRequest =
            serde_json::from_value(serde_json::json!({"question": "Quiero viajar a Roma"})).unwrap();

        let answer = planner.plan(&request).await;

        assert!(answer.answer.contains("GEMINI_API_KEY"));
        assert!(answer.photos.is_empty());
    }

    #[tokio::test]
    async fn test_plan_attaches_photos_and_weather() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("¡Hola!".to_string())], None));
        let planner = TripPlanner::new(
            DestinationExtractor::from_config(&ExtractorConfig::default()).unwrap(),
            Enricher::new()
                .with_weather(Arc::new(FakeWeather))
                .with_photos(Arc::new(FakePhotos)),
            ModelInvoker::new(Some(model.clone()), candidates()),
        );
        let request: PlanRequest =
            serde_json::from_value(serde_json::json!({"question": "Quiero viajar a Roma"})).unwrap();

        let answer = planner.plan(&request).await;

        assert_eq!(answer.answer, "¡Hola!");
        assert_eq!(answer.photos.len(), 3);
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("🌤️ CLIMA ACTUAL EN ROMA, IT:"));
        assert!(prompts[0].ends_with("Pregunta del usuario: Quiero viajar a Roma"));
    }

    #[tokio::test]
    async fn test_plan_failure_drops_photos() {
        let model = Arc::new(ScriptedModel::new(
            vec![Err(ViajeError::http("gemini", "operation timed out"))],
            None,
        ));
        let planner = TripPlanner::new(
            DestinationExtractor::from_config(&ExtractorConfig::default()).unwrap(),
            Enricher::new().with_photos(Arc::new(FakePhotos)),
            ModelInvoker::new(Some(model), candidates()),
        );
        let request: PlanRequest =
            serde_json::from_value(serde_json::json!({"question": "Quiero viajar a Roma"})).unwrap();

        let answer = planner.plan(&request).await;

        assert!(answer.answer.contains("operation timed out"));
        assert!(answer.photos.is_empty());
    }
}
