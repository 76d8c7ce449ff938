use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::domain::config::TranslationConfig;
use crate::domain::DomainError;
use crate::ports::BrailleTranslator;

/// Environment variable holding the API credential.
/// Its absence is a fatal startup condition.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Request body for the generateContent endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Translation provider backed by the Gemini generateContent API.
///
/// One request per finalized transcript, no retry. The response text is
/// trusted verbatim apart from whitespace trimming; an empty body counts
/// as a failure.
pub struct GeminiTranslator {
    client: Client,
    base_url: Url,
    model: String,
    api_key: String,
}

impl GeminiTranslator {
    pub fn new(config: &TranslationConfig, api_key: String) -> Result<Self, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::MissingCredential(API_KEY_ENV.to_string()));
        }

        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| DomainError::Config(format!("Invalid translation API URL: {e}")))?;

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("BrailleTalk/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {e}")))?;

        info!(model = %config.model, "GeminiTranslator initialized");

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> Result<Url, DomainError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| DomainError::Config(format!("Invalid endpoint: {e}")))
    }

    /// Instructions and input combined into a single direct prompt; the
    /// backend handles this more reliably than a system instruction.
    fn prompt(text: &str) -> String {
        format!(
            "Translate the following English text to Grade 1 Braille.\n\
             Respond ONLY with the Braille Unicode characters. Do not include any other text, explanations, or formatting.\n\
             English text: \"{text}\"\n\
             Braille translation:"
        )
    }

    fn extract_braille(response: GenerateResponse) -> Result<String, DomainError> {
        let braille = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if braille.is_empty() {
            return Err(DomainError::Translation(
                "The translation service returned an empty response.".to_string(),
            ));
        }
        Ok(braille)
    }
}

#[async_trait]
impl BrailleTranslator for GeminiTranslator {
    async fn translate(&self, text: &str) -> Result<String, DomainError> {
        let url = self.endpoint()?;
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::prompt(text),
                }],
            }],
        };

        debug!(chars = text.len(), "sending translation request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::Translation(format!(
                    "The AI service failed to process the translation request: {e}"
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Translation(format!(
                "The AI service failed to process the translation request (HTTP {status})"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::Translation(format!("Malformed translation response: {e}"))
        })?;

        Self::extract_braille(body)
    }
}
