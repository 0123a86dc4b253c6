// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction and per-call options for the [`Accountant`](crate::Accountant).

use std::fmt;

use tollgate_config::TollgateConfig;
use tollgate_core::{OutputContract, TollgateError};
use tollgate_openai::StructuredOutput;

/// Environment variable consulted when no explicit credential is given.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Options fixed for the lifetime of an accountant.
#[derive(Clone, Default)]
pub struct AccountantOptions {
    /// Explicit credential. Falls back to [`API_KEY_ENV`] when `None` or empty.
    pub api_key: Option<String>,
    /// Model identifier; must be priced.
    pub model: String,
    /// Loaded at construction when present.
    pub system_prompt: Option<String>,
    /// Ceiling on system + user prompt tokens.
    pub max_input_tokens: Option<usize>,
    /// Ceiling on generated tokens, forwarded to the service.
    pub max_output_tokens: Option<u32>,
    /// Caller tag used when a call does not supply its own.
    pub user: Option<String>,
}

impl AccountantOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_input_tokens(mut self, limit: usize) -> Self {
        self.max_input_tokens = Some(limit);
        self
    }

    pub fn with_max_output_tokens(mut self, limit: u32) -> Self {
        self.max_output_tokens = Some(limit);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builds options from a loaded config and an already-resolved system prompt.
    pub fn from_config(config: &TollgateConfig, system_prompt: Option<String>) -> Self {
        Self {
            api_key: config.openai.api_key.clone(),
            model: config.openai.model.clone(),
            system_prompt,
            max_input_tokens: config.budget.max_input_tokens,
            max_output_tokens: config.budget.max_output_tokens,
            user: config.openai.user.clone(),
        }
    }
}

impl fmt::Debug for AccountantOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountantOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("max_input_tokens", &self.max_input_tokens)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("user", &self.user)
            .finish()
    }
}

/// Per-call options for [`Accountant::process`](crate::Accountant::process).
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    /// Sampling temperature. Defaults to 0.
    pub temperature: Option<f32>,
    /// Caller-identity tag. Overrides the accountant's default tag.
    pub user: Option<String>,
    pub output: OutputContract,
}

impl ProcessOptions {
    pub fn new(output: OutputContract) -> Self {
        Self {
            temperature: None,
            user: None,
            output,
        }
    }

    /// Options whose output contract is derived from `T`.
    pub fn for_type<T: StructuredOutput>() -> Self {
        Self::new(T::output_contract())
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Picks the credential: a non-empty explicit key, else a non-empty
/// environment value.
pub fn resolve_api_key(
    explicit: Option<&str>,
    env_value: Option<String>,
) -> Result<String, TollgateError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    env_value.filter(|k| !k.is_empty()).ok_or_else(|| {
        TollgateError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
        ))
    })
}

/// Reads [`API_KEY_ENV`] from the process environment.
pub(crate) fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}
