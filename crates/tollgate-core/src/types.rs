// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the accountant, transports, and cost calculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Name tag used for the output contract when the caller does not supply one.
pub const DEFAULT_CONTRACT_NAME: &str = "data";

/// Currency tag attached to every cost breakdown.
pub const CURRENCY_USD: &str = "USD";

/// Role of a message in the request payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Describes the shape of the structured result the service should return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputContract {
    /// JSON schema the response must conform to.
    pub schema: serde_json::Value,
    /// Label for the schema in the request. Defaults to [`DEFAULT_CONTRACT_NAME`].
    #[serde(default)]
    pub name: Option<String>,
}

impl OutputContract {
    pub fn new(schema: serde_json::Value) -> Self {
        Self { schema, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name tag sent to the service.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_CONTRACT_NAME)
    }
}

/// A request handed to a [`CompletionTransport`](crate::CompletionTransport).
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    /// Caller-identity tag passed through to the service.
    pub user: Option<String>,
    pub output: OutputContract,
}

/// Raw token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUsage {
    pub total_tokens: u64,
    /// Not every response reports an output figure.
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

/// A completion as returned by the transport, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    /// Service-assigned response id.
    pub id: String,
    /// Structured payload parsed against the output contract.
    pub parsed: serde_json::Value,
    /// Full response body, kept for auditing.
    pub raw: serde_json::Value,
    pub usage: RawUsage,
}

/// Monetary cost of a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: String,
}

/// Normalized token usage attached to every response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    /// `None` when the model has no pricing entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostBreakdown>,
}

/// The value returned to the caller of `process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: T,
    pub raw_response: serde_json::Value,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
        assert_eq!(Role::from_str("assistant").unwrap(), Role::Assistant);
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn contract_name_defaults_to_data() {
        let contract = OutputContract::new(serde_json::json!({"type": "object"}));
        assert_eq!(contract.effective_name(), "data");
        let named = contract.with_name("countryInfo");
        assert_eq!(named.effective_name(), "countryInfo");
    }

    #[test]
    fn usage_without_cost_omits_field() {
        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
            total_tokens: 15,
            cost: None,
        };
        let value = serde_json::to_value(&usage).unwrap();
        assert!(value.get("cost").is_none());
        assert_eq!(value["total_tokens"], 15);
    }

    #[test]
    fn raw_usage_output_is_optional() {
        let usage: RawUsage = serde_json::from_str(r#"{"total_tokens": 42}"#).unwrap();
        assert_eq!(usage.total_tokens, 42);
        assert!(usage.output_tokens.is_none());
    }
}
