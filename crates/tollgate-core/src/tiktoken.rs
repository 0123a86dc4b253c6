// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BPE token counting backed by `tiktoken-rs`.

use tracing::trace;

use crate::error::TollgateError;
use crate::traits::Tokenizer;

/// Counts tokens with the encoding OpenAI uses for the given model.
///
/// The encoder is built and dropped inside each call, so nothing
/// accumulates across repeated calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiktokenTokenizer;

impl TiktokenTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, model: &str, text: &str) -> Result<usize, TollgateError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            TollgateError::Tokenizer {
                model: model.to_string(),
                message: e.to_string(),
            }
        })?;
        let count = bpe.encode_with_special_tokens(text).len();
        trace!(model, count, "counted tokens");
        Ok(count)
    }
}
