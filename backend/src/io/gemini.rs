//! # Gemini Extraction Client
//!
//! Calls the `generateContent` REST endpoint with a JSON response schema so
//! the model answers with exactly the fields of [`RawExtraction`]. Text is
//! sent as a single prompt part; receipts are sent as base64 `inlineData`
//! followed by the instruction prompt.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::ExpenseCategory;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::domain::errors::ExtractionError;
use crate::io::extractor::{ExpenseExtractor, RawExtraction};

/// Longest upstream error body kept in an error value
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("building HTTP client for Gemini")?;

        if config.api_key.is_empty() {
            warn!("Gemini client created without an API key");
        }
        info!("Gemini client using model {}", config.model);

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    pub fn build_text_request(&self, text: &str, today: NaiveDate) -> GenerateContentRequest {
        let prompt = format!(
            "Analyze the following text and extract expense details.\nToday's date is {}.\nText: \"{}\"",
            today.format("%Y-%m-%d"),
            text
        );

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: expense_schema(),
                temperature: Some(self.config.temperature),
            },
        }
    }

    pub fn build_image_request(
        &self,
        data: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> GenerateContentRequest {
        let prompt = format!(
            "Analyze this receipt image. Extract the total amount, the merchant name as the description, the date (default to {} if not visible), and categorize it.",
            today.format("%Y-%m-%d")
        );

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: BASE64.encode(data),
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: expense_schema(),
                temperature: None,
            },
        }
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<RawExtraction, ExtractionError> {
        let endpoint = self.endpoint();
        debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                ExtractionError::Request(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Request(e.to_string()))?;

        if !status.is_success() {
            error!("Gemini returned {}: {}", status, body);
            return Err(ExtractionError::UpstreamStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_generate_response(&body)
    }
}

#[async_trait]
impl ExpenseExtractor for GeminiClient {
    async fn extract_from_text(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<RawExtraction, ExtractionError> {
        let request = self.build_text_request(text, today);
        self.generate(&request).await
    }

    async fn extract_from_image(
        &self,
        data: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> Result<RawExtraction, ExtractionError> {
        let request = self.build_image_request(data, mime_type, today);
        self.generate(&request).await
    }
}

/// Structured-output schema for one expense
pub fn expense_schema() -> Value {
    let categories: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.name()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "amount": {
                "type": "NUMBER",
                "description": "The total numerical amount of the expense."
            },
            "category": {
                "type": "STRING",
                "description": format!(
                    "The best fitting category from the following list: {}. If unsure, use 'Other'.",
                    categories.join(", ")
                ),
                "enum": categories
            },
            "date": {
                "type": "STRING",
                "description": "The date of the expense in YYYY-MM-DD format. Use today's date if not specified."
            },
            "description": {
                "type": "STRING",
                "description": "A brief description of the expense (e.g., 'Lunch at Subway', 'Uber ride')."
            }
        },
        "required": ["amount", "category", "description"]
    })
}

/// Pull the JSON answer out of a `generateContent` response body
pub fn parse_generate_response(body: &str) -> Result<RawExtraction, ExtractionError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    serde_json::from_str(text.trim())
        .map_err(|e| ExtractionError::MalformedResponse(format!("{}: {}", e, text)))
}
