// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost calculation from a token split and a price table.
//!
//! Formula: `(tokens / 1_000_000) * price_per_million` per category, with
//! the total taken from the unrounded parts. Every figure is rounded to six
//! fractional digits.

use tollgate_core::types::{CURRENCY_USD, CostBreakdown};
use tracing::warn;

use crate::pricing::{ModelPricing, PriceTable};

const TOKENS_PER_MILLION: f64 = 1_000_000.0;
const COST_SCALE: f64 = 1_000_000.0;

/// Rounds a dollar figure to six fractional digits.
///
/// Rounding works on the exact decimal expansion of `value`, so a figure
/// stored just below a half-micro-dollar rounds down. Exact half-micro ties
/// round away from zero.
pub fn round_cost(value: f64) -> f64 {
    // Only odd multiples of 1/128 sit exactly on a half-micro-dollar.
    let steps = value * 128.0;
    if steps.fract() == 0.0 && steps % 2.0 != 0.0 {
        return (value * COST_SCALE).round() / COST_SCALE;
    }
    format!("{value:.6}").parse().unwrap_or(value)
}

/// Cost of a request for `model`, or `None` when the table has no entry.
///
/// A missing entry is not an error; callers treat an absent breakdown as
/// "cost unavailable".
pub fn calculate_cost(
    table: &PriceTable,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
) -> Option<CostBreakdown> {
    let Some(pricing) = table.lookup(model) else {
        warn!(model, "no pricing data found for model");
        return None;
    };
    Some(breakdown(pricing, input_tokens, output_tokens))
}

/// Cost of a request submitted through the batch API.
///
/// Returns `None` when the model is unpriced or has no batch discount.
pub fn calculate_batch_cost(
    table: &PriceTable,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
) -> Option<CostBreakdown> {
    let pricing = table.lookup(model)?.batch_pricing()?;
    Some(breakdown(&pricing, input_tokens, output_tokens))
}

fn breakdown(pricing: &ModelPricing, input_tokens: u64, output_tokens: u64) -> CostBreakdown {
    let input_cost = (input_tokens as f64 / TOKENS_PER_MILLION) * pricing.input_per_mtok;
    let output_cost = (output_tokens as f64 / TOKENS_PER_MILLION) * pricing.output_per_mtok;
    let total_cost = input_cost + output_cost;

    CostBreakdown {
        input_cost: round_cost(input_cost),
        output_cost: round_cost(output_cost),
        total_cost: round_cost(total_cost),
        currency: CURRENCY_USD.to_string(),
    }
}
