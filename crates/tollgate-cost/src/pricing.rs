// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model price tables.
//!
//! Default rates are OpenAI's standard-tier list prices in USD per million
//! tokens. Models without a published output rate (image generation) carry
//! an output rate of zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tollgate_config::model::PricingConfig;
use tracing::debug;

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Cost per million input tokens.
    pub input_per_mtok: f64,
    /// Cost per million output tokens.
    pub output_per_mtok: f64,
    /// Cost per million cached input tokens, where the model supports caching.
    pub cached_input_per_mtok: Option<f64>,
    /// Fractional discount for batch processing (0.5 = half price).
    pub batch_discount: Option<f64>,
}

impl ModelPricing {
    pub fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
            cached_input_per_mtok: None,
            batch_discount: None,
        }
    }

    pub fn with_cached_input(mut self, per_mtok: f64) -> Self {
        self.cached_input_per_mtok = Some(per_mtok);
        self
    }

    pub fn with_batch_discount(mut self, discount: f64) -> Self {
        self.batch_discount = Some(discount);
        self
    }

    /// Rates with the batch discount applied, or `None` if the model has no
    /// batch discount.
    pub fn batch_pricing(&self) -> Option<ModelPricing> {
        let factor = 1.0 - self.batch_discount?;
        Some(ModelPricing {
            input_per_mtok: self.input_per_mtok * factor,
            output_per_mtok: self.output_per_mtok * factor,
            cached_input_per_mtok: self.cached_input_per_mtok.map(|r| r * factor),
            batch_discount: None,
        })
    }
}

/// Read-only mapping from model identifier to pricing.
///
/// Injected into the accountant and the cost functions so tables can be
/// swapped or versioned without recompiling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    models: BTreeMap<String, ModelPricing>,
}

impl PriceTable {
    /// An empty table. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// OpenAI standard-tier pricing.
    pub fn openai_default() -> Self {
        let p = ModelPricing::new;
        let entries = [
            ("o4-mini", p(1.1, 4.4).with_cached_input(0.275)),
            (
                "gpt-4.1",
                p(2.0, 8.0).with_cached_input(0.5).with_batch_discount(0.5),
            ),
            (
                "gpt-4.1-mini",
                p(0.4, 1.6).with_cached_input(0.1).with_batch_discount(0.5),
            ),
            (
                "gpt-4.1-nano",
                p(0.1, 0.4).with_cached_input(0.025).with_batch_discount(0.5),
            ),
            (
                "gpt-4.5-preview",
                p(75.0, 150.0)
                    .with_cached_input(37.5)
                    .with_batch_discount(0.5),
            ),
            (
                "gpt-4o",
                p(2.5, 10.0).with_cached_input(1.25).with_batch_discount(0.5),
            ),
            ("gpt-4o-audio-preview", p(2.5, 10.0)),
            ("gpt-4o-realtime-preview", p(5.0, 20.0).with_cached_input(2.5)),
            (
                "gpt-4o-mini",
                p(0.15, 0.6).with_cached_input(0.075).with_batch_discount(0.5),
            ),
            ("gpt-4o-mini-audio-preview", p(0.15, 0.6)),
            (
                "gpt-4o-mini-realtime-preview",
                p(0.6, 2.4).with_cached_input(0.3),
            ),
            (
                "o1",
                p(15.0, 60.0).with_cached_input(7.5).with_batch_discount(0.5),
            ),
            ("o1-pro", p(150.0, 600.0)),
            ("o3", p(10.0, 40.0).with_cached_input(2.5)),
            (
                "o3-mini",
                p(1.1, 4.4).with_cached_input(0.55).with_batch_discount(0.5),
            ),
            (
                "o1-mini",
                p(1.1, 4.4).with_cached_input(0.55).with_batch_discount(0.5),
            ),
            ("codex-mini-latest", p(1.5, 6.0).with_cached_input(0.375)),
            ("gpt-4o-mini-search-preview", p(0.15, 0.6)),
            ("gpt-4o-search-preview", p(2.5, 10.0)),
            ("computer-use-preview", p(3.0, 12.0).with_batch_discount(0.5)),
            ("gpt-image-1", p(5.0, 0.0).with_cached_input(1.25)),
            ("chatgpt-4o-latest", p(5.0, 15.0)),
            ("gpt-4-turbo", p(10.0, 30.0)),
            ("gpt-4", p(30.0, 60.0)),
            ("gpt-4-32k", p(60.0, 120.0)),
            ("gpt-3.5-turbo", p(0.5, 1.5)),
            ("gpt-3.5-turbo-instruct", p(1.5, 2.0)),
            ("gpt-3.5-turbo-16k-0613", p(3.0, 4.0)),
            ("davinci-002", p(2.0, 2.0)),
            ("babbage-002", p(0.4, 0.4)),
        ];

        Self {
            models: entries
                .into_iter()
                .map(|(name, pricing)| (name.to_string(), pricing))
                .collect(),
        }
    }

    /// Builds the table described by the `[pricing]` config section.
    ///
    /// Starts from [`PriceTable::openai_default`] unless `replace_defaults`
    /// is set, then applies every configured model on top.
    pub fn from_config(config: &PricingConfig) -> Self {
        let mut table = if config.replace_defaults {
            Self::empty()
        } else {
            Self::openai_default()
        };

        for (model, rates) in &config.models {
            debug!(model = model.as_str(), "applying configured model pricing");
            table.insert(
                model.clone(),
                ModelPricing {
                    input_per_mtok: rates.input,
                    output_per_mtok: rates.output,
                    cached_input_per_mtok: rates.cached_input,
                    batch_discount: rates.batch_discount,
                },
            );
        }

        table
    }

    /// Adds or replaces a model entry, returning the table.
    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.insert(model.into(), pricing);
        self
    }

    /// Adds or replaces a model entry.
    pub fn insert(&mut self, model: String, pricing: ModelPricing) {
        self.models.insert(model, pricing);
    }

    /// Looks up pricing for an exact model identifier.
    pub fn lookup(&self, model: &str) -> Option<&ModelPricing> {
        self.models.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Priced model identifiers in sorted order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tollgate_config::model::ModelRateConfig;

    use super::*;

    #[test]
    fn gpt_4o_mini_pricing() {
        let table = PriceTable::openai_default();
        let p = table.lookup("gpt-4o-mini").unwrap();
        assert!((p.input_per_mtok - 0.15).abs() < f64::EPSILON);
        assert!((p.output_per_mtok - 0.6).abs() < f64::EPSILON);
        assert_eq!(p.cached_input_per_mtok, Some(0.075));
        assert_eq!(p.batch_discount, Some(0.5));
    }

    #[test]
    fn lookup_is_exact_match() {
        let table = PriceTable::openai_default();
        assert!(table.lookup("gpt-4o-mini-2024-07-18").is_none());
        assert!(table.lookup("GPT-4O").is_none());
        assert!(table.contains("o3"));
    }

    #[test]
    fn empty_table_misses_everything() {
        let table = PriceTable::empty();
        assert!(table.is_empty());
        assert!(table.lookup("gpt-4o").is_none());
    }

    #[test]
    fn batch_pricing_halves_rates() {
        let p = ModelPricing::new(2.0, 8.0)
            .with_cached_input(0.5)
            .with_batch_discount(0.5);
        let batch = p.batch_pricing().unwrap();
        assert!((batch.input_per_mtok - 1.0).abs() < f64::EPSILON);
        assert!((batch.output_per_mtok - 4.0).abs() < f64::EPSILON);
        assert_eq!(batch.cached_input_per_mtok, Some(0.25));
        assert!(batch.batch_discount.is_none());
    }

    #[test]
    fn no_batch_pricing_without_discount() {
        assert!(ModelPricing::new(1.0, 1.0).batch_pricing().is_none());
    }

    #[test]
    fn config_overrides_merge_over_defaults() {
        let mut config = PricingConfig::default();
        config.models.insert(
            "gpt-4o-mini".to_string(),
            ModelRateConfig {
                input: 1.0,
                output: 2.0,
                cached_input: None,
                batch_discount: None,
            },
        );
        config.models.insert(
            "local-model".to_string(),
            ModelRateConfig {
                input: 0.0,
                output: 0.0,
                cached_input: None,
                batch_discount: None,
            },
        );

        let table = PriceTable::from_config(&config);
        assert!((table.lookup("gpt-4o-mini").unwrap().input_per_mtok - 1.0).abs() < f64::EPSILON);
        assert!(table.contains("local-model"));
        assert!(table.contains("gpt-4o"), "defaults should survive a merge");
    }

    #[test]
    fn replace_defaults_drops_builtin_models() {
        let mut config = PricingConfig {
            replace_defaults: true,
            ..Default::default()
        };
        config.models.insert(
            "only-model".to_string(),
            ModelRateConfig {
                input: 1.0,
                output: 1.0,
                cached_input: None,
                batch_discount: None,
            },
        );

        let table = PriceTable::from_config(&config);
        assert_eq!(table.len(), 1);
        assert_eq!(table.models().collect::<Vec<_>>(), vec!["only-model"]);
    }
}
