//! LLM client: the single point of entry for all model calls in Resumate.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! Handlers depend on the `StructuredModel` trait; `LlmClient` is the production
//! implementation against an OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM refused the request: {0}")]
    Refusal(String),

    #[error("LLM output was truncated at the token limit")]
    Truncated,
}

/// One schema-constrained completion: a system instruction, a user message and
/// the JSON schema the answer must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub system: String,
    pub user: String,
    pub schema_name: String,
    pub schema: Value,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl StructuredRequest {
    /// Builds a request whose output schema is derived from `T`.
    pub fn for_schema<T: JsonSchema>(
        schema_name: &str,
        system: &str,
        user: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.to_string(),
            user,
            schema_name: schema_name.to_string(),
            schema: json_schema_of::<T>(),
            temperature,
            max_tokens,
        }
    }
}

/// A model that answers with a JSON value conforming to the requested schema.
///
/// Carried in `AppState` as `Arc<dyn StructuredModel>` so tests can swap in a fake.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Name of the underlying model, for logs and the health endpoint.
    fn model_name(&self) -> &str;

    async fn generate(&self, request: StructuredRequest) -> Result<Value, LlmError>;
}

/// Calls the model and deserializes its answer into `T`.
/// Either the whole object comes back or an error does.
pub async fn generate_object<T: DeserializeOwned>(
    model: &dyn StructuredModel,
    request: StructuredRequest,
) -> Result<T, LlmError> {
    let value = model.generate(request).await?;
    serde_json::from_value(value).map_err(LlmError::Parse)
}

/// JSON schema for `T`, stripped of the meta-schema marker the API does not accept.
pub fn json_schema_of<T: JsonSchema>() -> Value {
    let mut schema = schemars::schema_for!(T).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat<'a> {
    JsonSchema { json_schema: JsonSchemaFormat<'a> },
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// JSON text of the first choice. Refusals and truncated output are errors;
    /// a markdown code fence around the object is dropped.
    fn json_text(&self) -> Result<&str, LlmError> {
        let choice = self.choices.first().ok_or(LlmError::EmptyContent)?;
        if let Some(refusal) = &choice.message.refusal {
            return Err(LlmError::Refusal(refusal.clone()));
        }
        if choice.finish_reason.as_deref() == Some("length") {
            return Err(LlmError::Truncated);
        }
        choice
            .message
            .content
            .as_deref()
            .map(unfenced)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The production model client. One call per operation, no retries:
/// a failed call fails the user's request.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(config.llm_timeout).build()?,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
        })
    }

    /// Makes a raw chat completion call, returning the full response object.
    async fn call(
        &self,
        request: &StructuredRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let body = chat_body(&self.model, request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: schema={}, prompt_tokens={}, completion_tokens={}",
                request.schema_name, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl StructuredModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: StructuredRequest) -> Result<Value, LlmError> {
        let completion = self.call(&request).await?;
        serde_json::from_str(completion.json_text()?).map_err(LlmError::Parse)
    }
}

fn chat_body<'a>(model: &'a str, request: &'a StructuredRequest) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.user,
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format: ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: &request.schema_name,
                strict: false,
                schema: &request.schema,
            },
        },
    }
}

/// Trims model text and unwraps a markdown code fence, tagged `json` or bare.
fn unfenced(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}
