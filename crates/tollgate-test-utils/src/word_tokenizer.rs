// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic tokenizer: one token per whitespace-separated word.

use tollgate_core::{Tokenizer, TollgateError};

/// Counts whitespace-separated words, so test budgets can be written by eye.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    rejected_model: Option<String>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tokenizer that fails for `model` and counts words for every other model.
    pub fn rejecting(model: impl Into<String>) -> Self {
        Self {
            rejected_model: Some(model.into()),
        }
    }
}

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, model: &str, text: &str) -> Result<usize, TollgateError> {
        if self.rejected_model.as_deref() == Some(model) {
            return Err(TollgateError::Tokenizer {
                model: model.to_string(),
                message: "no encoding for model".to_string(),
            });
        }
        Ok(text.split_whitespace().count())
    }
}
