// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Responses API.
//!
//! Handles authentication, request serialization and error mapping. A
//! failed request is reported once; there is no retry loop here.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tollgate_core::TollgateError;
use tracing::debug;

use crate::types::{ApiErrorResponse, ResponsesRequest, ResponsesResponse};

/// Default base URL for the OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for OpenAI API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - bearer credential
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `timeout` - whole-request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, TollgateError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                TollgateError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TollgateError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
        })
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a request and returns the typed response with the raw body.
    pub async fn create_response(
        &self,
        request: &ResponsesRequest,
    ) -> Result<(ResponsesResponse, serde_json::Value), TollgateError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TollgateError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = request.model.as_str(), "response received");

        let body = response.text().await.map_err(|e| TollgateError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}): {}",
                    api_err
                        .error
                        .type_
                        .or(api_err.error.code)
                        .unwrap_or_else(|| status.to_string()),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(TollgateError::Provider {
                message,
                source: None,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| TollgateError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;
        let parsed: ResponsesResponse =
            serde_json::from_value(raw.clone()).map_err(|e| TollgateError::Provider {
                message: format!("unexpected API response shape: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok((parsed, raw))
    }
}
