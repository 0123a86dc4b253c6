// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express, such
//! as positive ceilings, known log levels, and sane price overrides.

use crate::diagnostic::ConfigError;
use crate::model::TollgateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TollgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.openai.model.trim().is_empty() {
        fail("openai.model must not be empty".to_string());
    }

    let base_url = config.openai.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "openai.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.openai.timeout_secs == 0 {
        fail("openai.timeout_secs must be greater than 0".to_string());
    }

    if let Some(api_key) = &config.openai.api_key {
        if api_key.trim().is_empty() {
            fail("openai.api_key must not be blank when set".to_string());
        }
    }

    if config.budget.max_input_tokens == Some(0) {
        fail("budget.max_input_tokens must be greater than 0 when set".to_string());
    }

    if config.budget.max_output_tokens == Some(0) {
        fail("budget.max_output_tokens must be greater than 0 when set".to_string());
    }

    if !LOG_LEVELS.contains(&config.logging.log_level.as_str()) {
        fail(format!(
            "logging.log_level `{}` must be one of: {}",
            config.logging.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    for (model, rates) in &config.pricing.models {
        let mut rate_values = vec![("input", rates.input), ("output", rates.output)];
        if let Some(cached) = rates.cached_input {
            rate_values.push(("cached_input", cached));
        }
        for (name, value) in rate_values {
            if !value.is_finite() || value < 0.0 {
                fail(format!(
                    "pricing.models.{model}.{name} must be non-negative, got {value}"
                ));
            }
        }

        if let Some(discount) = rates.batch_discount {
            if !(0.0..=1.0).contains(&discount) {
                fail(format!(
                    "pricing.models.{model}.batch_discount must be between 0 and 1, got {discount}"
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
