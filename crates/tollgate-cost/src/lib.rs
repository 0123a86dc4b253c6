// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Price tables and cost calculation for the Tollgate accountant.
//!
//! This crate provides:
//! - **Price table**: injectable per-model rates in USD per million tokens,
//!   seeded with OpenAI's standard-tier pricing and overridable from config
//! - **Cost calculation**: pure conversion of a token split into a rounded
//!   [`CostBreakdown`](tollgate_core::CostBreakdown)

pub mod calculator;
pub mod pricing;

pub use calculator::{calculate_batch_cost, calculate_cost, round_cost};
pub use pricing::{ModelPricing, PriceTable};
