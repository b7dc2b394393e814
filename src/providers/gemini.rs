//! Google Gemini REST adapter
//!
//! The credential travels in the `x-goog-api-key` header so it never shows up
//! in URLs or transport error messages.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{LanguageModel, endpoint, fetch_json, send};
use crate::{Result, ViajeError};

const PROVIDER: &str = "gemini";
const MODEL_PREFIX: &str = "models/";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl ModelEntry {
    /// Entries that advertise no methods are kept; older listings omit the field
    fn can_generate(&self) -> bool {
        self.supported_generation_methods.is_empty()
            || self
                .supported_generation_methods
                .iter()
                .any(|m| m == "generateContent")
    }
}

impl GeminiClient {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[instrument(skip(self, prompt), fields(provider = PROVIDER, prompt_len = prompt.len()))]
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let model_id = model.trim_start_matches(MODEL_PREFIX);
        let url = endpoint(
            &self.base_url,
            &format!("v1beta/models/{model_id}:generateContent"),
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response = match send(PROVIDER, request).await {
            Ok(response) => response,
            Err(ViajeError::Status { status: 404, .. }) => {
                return Err(ViajeError::ModelNotFound {
                    model: model_id.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ViajeError::parse(PROVIDER, e.to_string()))?;

        // Longer answers arrive split across several parts of the same candidate
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ViajeError::missing(
                PROVIDER,
                "candidates[0].content.parts[*].text",
            ));
        }

        debug!("Model {} answered with {} characters", model_id, text.len());
        Ok(text)
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn list_models(&self) -> Result<Vec<String>> {
        let request = self
            .client
            .get(endpoint(&self.base_url, "v1beta/models"))
            .header("x-goog-api-key", &self.api_key);

        let list: ModelList = fetch_json(PROVIDER, request).await?;
        Ok(list
            .models
            .into_iter()
            .filter(ModelEntry::can_generate)
            .map(|m| m.name.trim_start_matches(MODEL_PREFIX).to_string())
            .collect())
    }
}
