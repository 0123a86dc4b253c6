// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tollgate.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Tollgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TollgateConfig {
    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Token ceilings enforced before a request is sent.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// System prompt settings.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Price table overrides.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier. Must have an entry in the price table.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the API, without the trailing endpoint path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default caller-identity tag sent with every request.
    #[serde(default)]
    pub user: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Token ceilings. `None` means unlimited.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Maximum system + user prompt tokens per request.
    #[serde(default)]
    pub max_input_tokens: Option<usize>,

    /// Maximum tokens the service may generate per request.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// System prompt configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Inline system prompt string. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system prompt.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Price table configuration.
///
/// Configured models are layered over the built-in OpenAI table unless
/// `replace_defaults` is set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Start from an empty table instead of the built-in rates.
    #[serde(default)]
    pub replace_defaults: bool,

    /// Per-model rates keyed by model identifier.
    #[serde(default)]
    pub models: BTreeMap<String, ModelRateConfig>,
}

/// Rates for one model, in USD per million tokens.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRateConfig {
    pub input: f64,
    pub output: f64,
    #[serde(default)]
    pub cached_input: Option<f64>,
    /// Fraction taken off for batch requests (0.5 = half price).
    #[serde(default)]
    pub batch_discount: Option<f64>,
}
