// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion transport trait for remote model integrations.

use async_trait::async_trait;

use crate::error::TollgateError;
use crate::types::{CompletionRequest, CompletionResult};

/// Sends a prepared request to a remote completion service.
///
/// Transports own timeouts and connection handling. They never retry on
/// behalf of the accountant.
#[async_trait]
pub trait CompletionTransport: Send + Sync + 'static {
    /// Returns the human-readable name of this transport.
    fn name(&self) -> &str;

    /// Submits the request and returns the parsed completion with its usage.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResult, TollgateError>;
}
