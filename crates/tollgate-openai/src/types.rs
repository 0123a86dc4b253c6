// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Responses API request/response types.

use serde::{Deserialize, Serialize};
use tollgate_core::Message;

// --- Request types ---

/// A request to `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,

    /// Ordered role-tagged input messages.
    pub input: Vec<Message>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Caller-identity tag for abuse monitoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Structured output configuration.
    pub text: TextConfig,
}

/// The `text` block of a request.
#[derive(Debug, Clone, Serialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

/// A strict JSON schema output format.
#[derive(Debug, Clone, Serialize)]
pub struct TextFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

impl TextFormat {
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            name: name.into(),
            schema,
            strict: true,
        }
    }
}

// --- Response types ---

/// A response from `POST /responses`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    pub id: String,

    /// "completed", "incomplete", "failed", ...
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub usage: Option<ApiUsage>,

    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
}

impl ResponsesResponse {
    /// Concatenated `output_text` parts of every message item.
    pub fn output_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|c| match c {
                OutputContent::OutputText { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    /// The first refusal message, if the model refused.
    pub fn refusal(&self) -> Option<&str> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .find_map(|c| match c {
                OutputContent::Refusal { refusal } => Some(refusal.as_str()),
                _ => None,
            })
    }
}

/// One item of the `output` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    /// Reasoning, tool calls, and other items that carry no answer text.
    #[serde(other)]
    Other,
}

/// A content part inside an output message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    Refusal { refusal: String },
    #[serde(other)]
    Other,
}

/// Token usage as reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    pub total_tokens: u64,
}

/// Why a response stopped early.
#[derive(Debug, Clone, Deserialize)]
pub struct IncompleteDetails {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
