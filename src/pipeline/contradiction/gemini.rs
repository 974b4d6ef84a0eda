use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::types::LlmClient;
use super::CheckError;
use crate::config::AppConfig;

/// Finish reasons that mean the service withheld the answer on policy grounds.
const REFUSAL_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini `generateContent` client. One blocking request per check.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Zeroizing<String>,
    temperature: f32,
    timeout: Option<Duration>,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Build a client from the startup configuration.
    ///
    /// No request timeout is set unless the configuration asks for one.
    pub fn from_config(config: &AppConfig) -> Result<Self, CheckError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CheckError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            timeout: config.request_timeout,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CheckError {
        if e.is_timeout() {
            CheckError::Timeout(self.timeout.map(|t| t.as_secs()).unwrap_or_default())
        } else if e.is_connect() {
            CheckError::Connection(self.base_url.clone())
        } else {
            CheckError::HttpClient(e.to_string())
        }
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pull the reply text out of a decoded envelope, or explain why there is none.
fn extract_reply(envelope: GenerateContentResponse) -> Result<String, CheckError> {
    if let Some(reason) = envelope
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(CheckError::SafetyRefusal(format!("prompt blocked ({reason})")));
    }

    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CheckError::SafetyRefusal("no candidates returned".into()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if REFUSAL_FINISH_REASONS.contains(&reason) {
            return Err(CheckError::SafetyRefusal(format!("response withheld ({reason})")));
        }
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    Ok(text)
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, CheckError> {
        let body = GenerateContentRequest {
            system_instruction: RequestContent {
                role: None,
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CheckError::Unauthorized(status.as_u16()),
                429 => CheckError::RateLimited,
                code => CheckError::Service { status: code, body },
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .map_err(|e| CheckError::MalformedEnvelope(e.to_string()))?;

        extract_reply(envelope)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Mock LLM client for testing. Returns a configurable reply or failure
/// and records every prompt it receives.
pub struct MockLlmClient {
    reply: Result<String, CheckError>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CheckError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, prompt: &str, _system: &str) -> Result<String, CheckError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone()
    }

    fn model(&self) -> &str {
        "mock"
    }
}
