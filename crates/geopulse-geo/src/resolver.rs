//! Resolver adapters: convert a place name into coordinates.
//!
//! The cache treats resolvers as opaque capabilities. The production adapter
//! asks an LLM geocoding assistant for a JSON coordinate pair; a static
//! table adapter serves fixtures and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::types::{Coordinates, ResolveError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const SYSTEM_PROMPT: &str = "You are a geolocation assistant. Return only JSON \
with latitude and longitude of the city, rounded to 2 decimal places.";

/// A capability that maps a place name to coordinates.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolveError>;
}

/// Configuration for [`LlmResolver`]. Constructed explicitly by the caller;
/// nothing here is read from the environment at import time.
#[derive(Debug, Clone)]
pub struct LlmResolverConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmResolverConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (e.g. to point tests at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CoordinateReply {
    latitude: f64,
    longitude: f64,
}

/// LLM-backed geocoder using the OpenAI chat completions API.
#[derive(Debug, Clone)]
pub struct LlmResolver {
    client: Client,
    config: LlmResolverConfig,
}

impl LlmResolver {
    /// Build the resolver and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the client cannot be built.
    pub fn new(config: LlmResolverConfig) -> Result<Self, ResolveError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Resolve for LlmResolver {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolveError> {
        let prompt = format!(
            "Give me latitude and longitude of {place} in JSON format with keys latitude and longitude."
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%place, status = status.as_u16(), "geocoding request rejected");
            return Err(ResolveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ResolveError::Parse("reply contained no choices".to_string()))?;

        parse_coordinate_reply(content)
    }
}

/// Parse the assistant reply into coordinates: strip markdown code fences,
/// decode the JSON object, round to 2 decimal places, validate ranges.
fn parse_coordinate_reply(content: &str) -> Result<Coordinates, ResolveError> {
    let json = strip_code_fences(content);
    let reply: CoordinateReply =
        serde_json::from_str(json).map_err(|e| ResolveError::Parse(e.to_string()))?;
    Coordinates::checked(round2(reply.latitude), round2(reply.longitude))
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Static table resolver. Keys are matched against the normalized place
/// name, so insertions should use lowercase names.
#[derive(Debug, Default)]
pub struct TableResolver {
    places: HashMap<String, Coordinates>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, place: impl Into<String>, coordinates: Coordinates) {
        self.places.insert(place.into(), coordinates);
    }
}

#[async_trait]
impl Resolve for TableResolver {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolveError> {
        self.places
            .get(place)
            .copied()
            .ok_or_else(|| ResolveError::Unknown(place.to_string()))
    }
}
