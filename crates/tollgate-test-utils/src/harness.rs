// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end accountant testing.
//!
//! `TestHarness` assembles an [`Accountant`] over a [`MockTransport`] and a
//! [`WordTokenizer`], so budgets can be reasoned about in words and every
//! outbound request can be inspected.

use std::sync::Arc;

use tollgate_accountant::{Accountant, AccountantOptions, ProcessOptions};
use tollgate_core::{CompletionResult, OutputContract, ResponseEnvelope, TollgateError};
use tollgate_cost::{ModelPricing, PriceTable};

use crate::mock_transport::MockTransport;
use crate::word_tokenizer::WordTokenizer;

/// Model the harness prices and configures by default.
pub const TEST_MODEL: &str = "gpt-4o-mini";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    results: Vec<CompletionResult>,
    options: AccountantOptions,
    prices: Option<PriceTable>,
    tokenizer: WordTokenizer,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            results: Vec::new(),
            options: AccountantOptions::new(TEST_MODEL).with_api_key("sk-test"),
            prices: None,
            tokenizer: WordTokenizer::new(),
        }
    }

    /// Set mock transport results.
    pub fn with_results(mut self, results: Vec<CompletionResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.options.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_input_tokens(mut self, limit: usize) -> Self {
        self.options.max_input_tokens = Some(limit);
        self
    }

    pub fn with_max_output_tokens(mut self, limit: u32) -> Self {
        self.options.max_output_tokens = Some(limit);
        self
    }

    /// Replace the price table. Defaults to gpt-4o-mini at 0.15 / 0.6.
    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = Some(prices);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: WordTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Build the harness. Fails exactly when accountant construction fails.
    pub fn build(self) -> Result<TestHarness, TollgateError> {
        let prices = self.prices.unwrap_or_else(|| {
            PriceTable::empty().with_model(TEST_MODEL, ModelPricing::new(0.15, 0.6))
        });
        let transport = Arc::new(MockTransport::with_results(self.results));
        let accountant = Accountant::with_collaborators(
            self.options,
            Arc::new(prices),
            transport.clone(),
            Arc::new(self.tokenizer),
        )?;

        Ok(TestHarness {
            accountant: Arc::new(accountant),
            transport,
        })
    }
}

/// An accountant wired to a mock transport.
pub struct TestHarness {
    /// The accountant under test.
    pub accountant: Arc<Accountant>,
    /// The mock transport it sends to.
    pub transport: Arc<MockTransport>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Process `prompt` with an open object contract and default options.
    pub async fn process(
        &self,
        prompt: &str,
    ) -> Result<ResponseEnvelope<serde_json::Value>, TollgateError> {
        self.accountant
            .process(
                prompt,
                ProcessOptions::new(OutputContract::new(
                    serde_json::json!({"type": "object"}),
                )),
            )
            .await
    }
}
