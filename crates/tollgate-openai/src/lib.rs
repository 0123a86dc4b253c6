// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI transport for the Tollgate token accountant.
//!
//! This crate implements [`CompletionTransport`] for the OpenAI Responses
//! API with strict JSON-schema structured output. The parsed payload is
//! checked against the contract schema before it is handed back.

pub mod client;
pub mod schema;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tollgate_config::model::OpenAiConfig;
use tollgate_core::{
    CompletionRequest, CompletionResult, CompletionTransport, RawUsage, TollgateError,
};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;
use crate::types::{ResponsesRequest, ResponsesResponse, TextConfig, TextFormat};

pub use schema::{StructuredOutput, validate_payload};

/// OpenAI Responses API transport implementing [`CompletionTransport`].
pub struct OpenAiTransport {
    client: OpenAiClient,
}

impl OpenAiTransport {
    /// Creates a transport against an explicit endpoint.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, TollgateError> {
        let client = OpenAiClient::new(api_key, base_url, timeout)?;
        info!(endpoint = client.endpoint(), "OpenAI transport initialized");
        Ok(Self { client })
    }

    /// Creates a transport from the `[openai]` config section.
    ///
    /// The credential is passed separately because it may come from the
    /// environment rather than the config file.
    pub fn from_config(config: &OpenAiConfig, api_key: &str) -> Result<Self, TollgateError> {
        Self::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn to_wire(request: CompletionRequest) -> ResponsesRequest {
        let name = request.output.effective_name().to_string();
        ResponsesRequest {
            model: request.model,
            input: request.messages,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            user: request.user,
            text: TextConfig {
                format: TextFormat::json_schema(name, request.output.schema),
            },
        }
    }
}

/// Maps the API usage block onto [`RawUsage`].
fn usage_from_response(response: &ResponsesResponse) -> RawUsage {
    match &response.usage {
        Some(usage) => RawUsage {
            total_tokens: usage.total_tokens,
            output_tokens: usage.output_tokens,
        },
        None => {
            warn!(response_id = response.id.as_str(), "response carried no usage block");
            RawUsage::default()
        }
    }
}

/// Rejects refusals and truncated responses, then extracts the answer text.
fn answer_text(response: &ResponsesResponse) -> Result<String, TollgateError> {
    if let Some(refusal) = response.refusal() {
        return Err(TollgateError::Provider {
            message: format!("model refused the request: {refusal}"),
            source: None,
        });
    }

    if response.status.as_deref() == Some("incomplete") {
        let reason = response
            .incomplete_details
            .as_ref()
            .and_then(|d| d.reason.as_deref())
            .unwrap_or("unknown");
        return Err(TollgateError::Provider {
            message: format!("response incomplete: {reason}"),
            source: None,
        });
    }

    response.output_text().ok_or_else(|| TollgateError::Provider {
        message: "response contained no output text".to_string(),
        source: None,
    })
}

#[async_trait]
impl CompletionTransport for OpenAiTransport {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResult, TollgateError> {
        let schema = request.output.schema.clone();
        let wire = Self::to_wire(request);
        debug!(
            model = wire.model.as_str(),
            messages = wire.input.len(),
            format = wire.text.format.name.as_str(),
            "sending responses request"
        );

        let (response, raw) = self.client.create_response(&wire).await?;

        let text = answer_text(&response)?;
        let parsed: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| TollgateError::Schema(format!("response is not valid JSON: {e}")))?;
        validate_payload(&schema, &parsed)?;

        Ok(CompletionResult {
            id: response.id.clone(),
            usage: usage_from_response(&response),
            parsed,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use tollgate_core::{ErrorKind, Message, OutputContract};

    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::system("Be terse."), Message::user("hi")],
            temperature: 0.2,
            max_output_tokens: Some(100),
            user: Some("u-1".into()),
            output: OutputContract::new(serde_json::json!({"type": "object"})),
        }
    }

    #[test]
    fn to_wire_uses_default_contract_name() {
        let wire = OpenAiTransport::to_wire(request());
        assert_eq!(wire.text.format.name, "data");
        assert_eq!(wire.input.len(), 2);
        assert_eq!(wire.user.as_deref(), Some("u-1"));
        assert_eq!(wire.max_output_tokens, Some(100));
    }

    #[test]
    fn to_wire_keeps_explicit_contract_name() {
        let mut req = request();
        req.output = req.output.with_name("Country");
        let wire = OpenAiTransport::to_wire(req);
        assert_eq!(wire.text.format.name, "Country");
    }

    #[test]
    fn missing_usage_maps_to_zero_total() {
        let response: ResponsesResponse =
            serde_json::from_value(serde_json::json!({"id": "r", "output": []})).unwrap();
        let usage = usage_from_response(&response);
        assert_eq!(usage.total_tokens, 0);
        assert!(usage.output_tokens.is_none());
    }

    #[test]
    fn incomplete_response_is_provider_error() {
        let response: ResponsesResponse = serde_json::from_value(serde_json::json!({
            "id": "r",
            "status": "incomplete",
            "incomplete_details": {"reason": "max_output_tokens"},
            "output": [{"type": "message", "content": [
                {"type": "output_text", "text": "{\"a\":"}
            ]}]
        }))
        .unwrap();
        let err = answer_text(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("max_output_tokens"));
    }

    #[test]
    fn empty_output_is_provider_error() {
        let response: ResponsesResponse =
            serde_json::from_value(serde_json::json!({"id": "r", "output": []})).unwrap();
        assert!(answer_text(&response).is_err());
    }

    #[test]
    fn from_config_uses_configured_endpoint() {
        let config = OpenAiConfig::default();
        let transport = OpenAiTransport::from_config(&config, "sk-test").unwrap();
        assert_eq!(transport.name(), "openai");
        assert_eq!(
            transport.client.endpoint(),
            "https://api.openai.com/v1/responses"
        );
    }
}
