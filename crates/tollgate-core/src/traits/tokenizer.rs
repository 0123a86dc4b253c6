// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokenizer trait for counting tokens before a request is sent.

use crate::error::TollgateError;

/// Counts the tokens a model would charge for a piece of text.
///
/// Implementations must be deterministic for a given `(model, text)` pair
/// and must not hold per-call resources beyond the call itself.
pub trait Tokenizer: Send + Sync + 'static {
    /// Returns the number of tokens `text` encodes to under `model`.
    fn count_tokens(&self, model: &str, text: &str) -> Result<usize, TollgateError>;
}
