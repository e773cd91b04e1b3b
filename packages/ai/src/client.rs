// ABOUTME: Client for making structured proposal generation calls to OpenAI
// ABOUTME: Handles API requests, response parsing, and failure classification

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use offerkit_core::Proposal;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid response format")]
    InvalidResponse,
}

impl GenerationError {
    /// Whether the provider reported the API key's usage quota as exhausted.
    ///
    /// This is the single place that inspects provider error text for the
    /// quota marker. The orchestrator branches only on this predicate, so the
    /// matching condition can be hardened without touching callers.
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            GenerationError::Api { message, .. } => {
                message.contains("insufficient_quota") || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
    response_format: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// JSON schema pinning the model output to the Proposal shape: proposal text
/// plus an ordered list of line items with the five item fields.
fn proposal_response_format() -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": "proposal",
            "strict": true,
            "schema": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "proposalText": {
                        "type": "string",
                        "description": "The complete, formatted proposal text including salutation, introduction, description of the work, and closing."
                    },
                    "lineItems": {
                        "type": "array",
                        "description": "All calculated proposal line items, in presentation order.",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "properties": {
                                "description": {
                                    "type": "string",
                                    "description": "Detailed description of the work or material."
                                },
                                "quantity": { "type": "number" },
                                "unit": {
                                    "type": "string",
                                    "description": "Unit label, e.g. 'piece', 'm', 'h', 'lump sum'."
                                },
                                "unitPrice": { "type": "number" },
                                "totalPrice": {
                                    "type": "number",
                                    "description": "quantity * unitPrice for this item."
                                }
                            },
                            "required": ["description", "quantity", "unit", "unitPrice", "totalPrice"]
                        }
                    }
                },
                "required": ["proposalText", "lineItems"]
            }
        }
    })
}

/// Client for structured proposal generation calls.
pub struct GenerationClient {
    client: Client,
    base_url: String,
}

impl GenerationClient {
    /// Create HTTP client with timeout configuration
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn new() -> Self {
        Self {
            client: Self::create_client(),
            base_url: OPENAI_API_BASE.to_string(),
        }
    }

    /// Creates a client pointed at a custom API base URL (used in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Self::create_client(),
            base_url: base_url.into(),
        }
    }

    /// Makes one structured generation call and parses the result into a
    /// [`Proposal`].
    ///
    /// The model is asked to compute realistic quantities and prices and to
    /// set totalPrice = quantity * unitPrice for every item. That is a
    /// quality expectation, not enforced here: whatever the model returns is
    /// passed through, arithmetic consistency included.
    pub async fn generate(
        &self,
        request_details: &str,
        model: &str,
        api_key: &str,
    ) -> GenerationResult<Proposal> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_prompt(request_details),
                },
            ],
            response_format: proposal_response_format(),
        };

        info!("Requesting proposal generation: model={}", model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ParseError(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(GenerationError::InvalidResponse)?;

        let json_text = strip_code_fences(content);

        let proposal: Proposal = serde_json::from_str(json_text).map_err(|e| {
            error!(
                "Proposal JSON parsing failed: {}. JSON snippet: {}",
                e,
                snippet(json_text, 500)
            );
            GenerationError::ParseError(format!("Failed to parse proposal JSON: {}", e))
        })?;

        Ok(proposal)
    }
}

impl Default for GenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate text for logging without splitting a multibyte character.
fn snippet(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Strip markdown code fences if present (```json ... ```). Structured output
/// should return bare JSON, but lower model tiers occasionally fence it.
fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned;
    }

    let start = cleaned.find('\n').map(|i| i + 1).unwrap_or(0);
    let end = cleaned[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned.len());
    cleaned[start..end].trim()
}
