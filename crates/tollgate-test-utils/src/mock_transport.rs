// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion transport for deterministic testing.
//!
//! `MockTransport` implements `CompletionTransport` with pre-configured
//! results, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tollgate_core::{
    CompletionRequest, CompletionResult, CompletionTransport, RawUsage, TollgateError,
};

/// Builds a completion result with the given payload and usage.
pub fn mock_result(
    parsed: serde_json::Value,
    total_tokens: u64,
    output_tokens: Option<u64>,
) -> CompletionResult {
    let id = format!("mock-resp-{}", uuid::Uuid::new_v4());
    CompletionResult {
        raw: serde_json::json!({
            "id": id,
            "object": "response",
            "usage": {"total_tokens": total_tokens, "output_tokens": output_tokens},
        }),
        id,
        parsed,
        usage: RawUsage {
            total_tokens,
            output_tokens,
        },
    }
}

/// A mock transport that returns pre-configured results.
///
/// Results are popped from a FIFO queue. When the queue is empty, a
/// default `{}` payload with 30 total / 20 output tokens is returned.
/// Every request is recorded.
pub struct MockTransport {
    results: Arc<Mutex<VecDeque<Result<CompletionResult, TollgateError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Create a new mock transport with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock transport pre-loaded with the given results.
    pub fn with_results(results: Vec<CompletionResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Queue a successful result.
    pub async fn push_result(&self, result: CompletionResult) {
        self.results.lock().await.push_back(Ok(result));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: TollgateError) {
        self.results.lock().await.push_back(Err(error));
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().await.last().cloned()
    }

    async fn next_result(&self) -> Result<CompletionResult, TollgateError> {
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(mock_result(serde_json::json!({}), 30, Some(20))))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResult, TollgateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        self.next_result().await
    }
}
