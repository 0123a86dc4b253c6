// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tollgate token accountant.

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used across Tollgate traits and core operations.
#[derive(Debug, Error)]
pub enum TollgateError {
    /// Configuration errors (missing credential, unpriced model, bad config values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Projected input tokens exceed the configured ceiling.
    ///
    /// Raised before any request leaves the process.
    #[error("budget exceeded: {message} ({projected} > {limit} input tokens)")]
    BudgetExceeded {
        message: String,
        projected: usize,
        limit: usize,
    },

    /// A `process` call failed after the budget check passed.
    ///
    /// Wraps tokenizer, transport, and schema failures with the original message.
    #[error("error processing request: {message}")]
    Processing {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Tokenizer could not encode text for the given model.
    #[error("tokenizer error for model `{model}`: {message}")]
    Tokenizer { model: String, message: String },

    /// Completion service errors (HTTP failure, API error, refusal).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Structured payload did not match the requested output contract.
    #[error("schema error: {0}")]
    Schema(String),
}

/// Coarse classification of a [`TollgateError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    BudgetExceeded,
    Processing,
    Tokenizer,
    Provider,
    Schema,
}

impl TollgateError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TollgateError::Config(_) => ErrorKind::Configuration,
            TollgateError::BudgetExceeded { .. } => ErrorKind::BudgetExceeded,
            TollgateError::Processing { .. } => ErrorKind::Processing,
            TollgateError::Tokenizer { .. } => ErrorKind::Tokenizer,
            TollgateError::Provider { .. } => ErrorKind::Provider,
            TollgateError::Schema(_) => ErrorKind::Schema,
        }
    }

    /// Wraps a collaborator failure as a [`TollgateError::Processing`].
    ///
    /// The wrapped error's display text becomes the message and the error
    /// itself is kept as the source. Already-wrapped errors pass through.
    pub fn into_processing(self) -> TollgateError {
        match self {
            TollgateError::Processing { .. } => self,
            other => TollgateError::Processing {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
