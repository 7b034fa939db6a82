//! OpenRouter wire types and the remote chat gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use tracing::debug;

use crate::core::config::Config;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelPricing {
    pub prompt: Option<Value>,
    pub completion: Option<Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub pricing: Option<ModelPricing>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Connection, TLS, or timeout failure before a response arrived.
    Network(reqwest::Error),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The response arrived but did not match the expected shape.
    Malformed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(err) => write!(f, "Network error: {err}"),
            ApiError::Api { status, message } => {
                write!(f, "OpenRouter API error {status}: {message}")
            }
            ApiError::Malformed(detail) => write!(f, "Unexpected API response: {detail}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

/// The remote collaborator the session talks to. Object-safe so tests can
/// substitute a scripted gateway for the HTTP client.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send the full transcript and return the assistant's reply text.
    async fn send_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
    ) -> Result<String, ApiError>;

    /// Fetch the current free-tier model catalogue, in service order.
    async fn list_models(&self) -> Result<Vec<String>, ApiError>;
}

pub struct OpenRouterClient {
    http: reqwest::Client,
    config: Config,
}

impl OpenRouterClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;
        Ok(OpenRouterClient { http, config })
    }
}

#[async_trait]
impl ChatGateway for OpenRouterClient {
    async fn send_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
    ) -> Result<String, ApiError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
        };
        debug!(model, "sending chat completion request");

        let response = self
            .http
            .post(join_url(&self.config.base_url, "chat/completions"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", &self.config.app_referer)
            .header("X-Title", &self.config.app_title)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let payload: ChatResponse = response.json().await.map_err(|_| {
            ApiError::Malformed("chat completion body did not match the expected shape".to_string())
        })?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ApiError::Malformed("chat completion contained no choices".to_string()))
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let key = if self.config.api_key.is_empty() {
            None
        } else {
            Some(self.config.api_key.as_str())
        };
        fetch_free_models(&self.http, &self.config, key).await
    }
}

/// Fetch the free-tier model ids from the public catalogue.
///
/// Authentication is optional here; the catalogue endpoint is public and the
/// `--list-models` path may run without a credential.
pub async fn fetch_free_models(
    http: &reqwest::Client,
    config: &Config,
    api_key: Option<&str>,
) -> Result<Vec<String>, ApiError> {
    let mut request = http
        .get(join_url(&config.base_url, "models"))
        .header("HTTP-Referer", &config.app_referer)
        .header("X-Title", &config.app_title);
    if let Some(key) = api_key {
        request = request.header("Authorization", format!("Bearer {key}"));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let payload: ModelsResponse = response.json().await.map_err(|_| {
        ApiError::Malformed("model list payload is missing the 'data' array".to_string())
    })?;
    let models = free_model_ids(payload);
    debug!(count = models.len(), "fetched free-tier model catalogue");
    Ok(models)
}

/// Free-tier ids from a catalogue response, deduped in first-seen order.
fn free_model_ids(response: ModelsResponse) -> Vec<String> {
    let mut models = Vec::new();
    for info in response.data {
        if !is_free_model(&info.id, info.pricing.as_ref()) {
            continue;
        }
        if !models.contains(&info.id) {
            models.push(info.id);
        }
    }
    models
}

fn is_free_model(id: &str, pricing: Option<&ModelPricing>) -> bool {
    if id.to_ascii_lowercase().ends_with(":free") {
        return true;
    }
    match pricing {
        Some(pricing) => {
            pricing.prompt.as_ref().is_some_and(is_zero_cost)
                && pricing.completion.as_ref().is_some_and(is_zero_cost)
        }
        None => false,
    }
}

/// Pricing fields arrive as numbers or strings depending on the provider.
fn is_zero_cost(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => {
            let trimmed = text.trim().to_ascii_lowercase();
            if trimmed.is_empty() {
                return false;
            }
            matches!(trimmed.as_str(), "0" | "0.0" | "0.00" | "free")
                || trimmed.parse::<f64>() == Ok(0.0)
        }
        _ => false,
    }
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .or_else(|| value.get("message").and_then(Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.to_string()
            }
        });
    ApiError::Api { status, message }
}

/// Join a base URL and an endpoint without producing double slashes.
fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
