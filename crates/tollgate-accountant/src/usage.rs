// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciles the service's raw usage report into an input/output split.

use tollgate_core::{CostBreakdown, RawUsage, TokenUsage};

/// How the input/output split of a completion was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSplit {
    /// The service reported output tokens; input is the remainder of the total.
    Reported { input: u64, output: u64, total: u64 },
    /// Only a total was reported. The whole total is attributed to input,
    /// which over-counts input and under-counts output.
    TotalOnly { total: u64 },
}

impl UsageSplit {
    pub fn from_raw(raw: RawUsage) -> Self {
        match raw.output_tokens {
            Some(output) => UsageSplit::Reported {
                input: raw.total_tokens.saturating_sub(output),
                output,
                total: raw.total_tokens,
            },
            None => UsageSplit::TotalOnly {
                total: raw.total_tokens,
            },
        }
    }

    pub fn input_tokens(&self) -> u64 {
        match *self {
            UsageSplit::Reported { input, .. } => input,
            UsageSplit::TotalOnly { total } => total,
        }
    }

    pub fn output_tokens(&self) -> u64 {
        match *self {
            UsageSplit::Reported { output, .. } => output,
            UsageSplit::TotalOnly { .. } => 0,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        match *self {
            UsageSplit::Reported { total, .. } | UsageSplit::TotalOnly { total } => total,
        }
    }

    /// Whether the split is exact rather than approximated from a total.
    pub fn is_exact(&self) -> bool {
        matches!(self, UsageSplit::Reported { .. })
    }

    pub fn into_token_usage(self, cost: Option<CostBreakdown>) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens(),
            output_tokens: self.output_tokens(),
            total_tokens: self.total_tokens(),
            cost,
        }
    }
}
