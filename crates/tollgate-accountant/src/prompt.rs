// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt state and config-driven prompt loading.

use tollgate_config::model::PromptConfig;
use tollgate_core::TollgateError;
use tracing::info;

/// A loaded system prompt with its precomputed token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt {
    text: String,
    tokens: usize,
}

impl SystemPrompt {
    pub(crate) fn new(text: String, tokens: usize) -> Self {
        Self { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Resolves the configured system prompt: file > inline > none.
///
/// A configured file that cannot be read is an error, not a fallback.
pub async fn resolve_system_prompt(config: &PromptConfig) -> Result<Option<String>, TollgateError> {
    if let Some(ref file_path) = config.system_prompt_file {
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            TollgateError::Config(format!(
                "failed to read system prompt file `{file_path}`: {e}"
            ))
        })?;
        info!(path = file_path.as_str(), "loaded system prompt from file");
        return Ok(Some(content.trim().to_string()));
    }

    Ok(config.system_prompt.clone())
}
