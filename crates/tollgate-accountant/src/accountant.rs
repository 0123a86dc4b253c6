// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The budget and usage accountant.
//!
//! Owns the system prompt state, enforces the input-token ceiling before a
//! request leaves the process, and reconciles the service's usage report
//! into a [`ResponseEnvelope`].

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use serde::de::DeserializeOwned;
use tollgate_config::TollgateConfig;
use tollgate_core::{
    CompletionRequest, CompletionTransport, Message, ResponseEnvelope, TiktokenTokenizer,
    Tokenizer, TollgateError,
};
use tollgate_cost::{PriceTable, calculate_cost};
use tollgate_openai::OpenAiTransport;
use tollgate_openai::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use tracing::{debug, info};

use crate::options::{AccountantOptions, ProcessOptions, env_api_key, resolve_api_key};
use crate::prompt::{SystemPrompt, resolve_system_prompt};
use crate::usage::UsageSplit;

const SYSTEM_PROMPT_TOO_LARGE: &str =
    "system prompt is larger than the max number of input tokens allowed";
const PROMPT_TOO_LARGE: &str =
    "prompt (system+user) is larger than the max number of input tokens allowed";

/// Guards and accounts for requests to a completion service.
///
/// `Accountant` is `Send + Sync`; share it behind an `Arc`. Each
/// [`process`](Self::process) call snapshots the system prompt at its
/// start, so a concurrent [`load_system_prompt`](Self::load_system_prompt)
/// is observed either fully or not at all.
pub struct Accountant {
    model: String,
    max_input_tokens: Option<usize>,
    max_output_tokens: Option<u32>,
    default_user: Option<String>,
    system_prompt: ArcSwapOption<SystemPrompt>,
    prices: ArcSwap<PriceTable>,
    transport: Arc<dyn CompletionTransport>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Accountant {
    /// Builds an accountant backed by the OpenAI transport and tiktoken.
    pub fn from_options(
        options: AccountantOptions,
        prices: Arc<PriceTable>,
    ) -> Result<Self, TollgateError> {
        let api_key = resolve_api_key(options.api_key.as_deref(), env_api_key())?;
        let transport = OpenAiTransport::new(&api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)?;
        Self::assemble(
            options,
            prices,
            Arc::new(transport),
            Arc::new(TiktokenTokenizer::new()),
        )
    }

    /// Builds an accountant from a loaded config.
    ///
    /// The price table is the default list with the `[pricing]` section
    /// applied, and the system prompt comes from `[prompt]`.
    pub async fn from_config(config: &TollgateConfig) -> Result<Self, TollgateError> {
        let system_prompt = resolve_system_prompt(&config.prompt).await?;
        let options = AccountantOptions::from_config(config, system_prompt);
        let api_key = resolve_api_key(options.api_key.as_deref(), env_api_key())?;
        let transport = OpenAiTransport::from_config(&config.openai, &api_key)?;
        let prices = Arc::new(PriceTable::from_config(&config.pricing));
        Self::assemble(
            options,
            prices,
            Arc::new(transport),
            Arc::new(TiktokenTokenizer::new()),
        )
    }

    /// Builds an accountant over injected collaborators.
    ///
    /// The credential is still required even though the transport is
    /// supplied.
    pub fn with_collaborators(
        options: AccountantOptions,
        prices: Arc<PriceTable>,
        transport: Arc<dyn CompletionTransport>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self, TollgateError> {
        resolve_api_key(options.api_key.as_deref(), env_api_key())?;
        Self::assemble(options, prices, transport, tokenizer)
    }

    fn assemble(
        options: AccountantOptions,
        prices: Arc<PriceTable>,
        transport: Arc<dyn CompletionTransport>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self, TollgateError> {
        if !prices.contains(&options.model) {
            return Err(TollgateError::Config(format!(
                "model `{}` has no pricing entry",
                options.model
            )));
        }

        let accountant = Self {
            model: options.model,
            max_input_tokens: options.max_input_tokens,
            max_output_tokens: options.max_output_tokens,
            default_user: options.user,
            system_prompt: ArcSwapOption::empty(),
            prices: ArcSwap::new(prices),
            transport,
            tokenizer,
        };

        if let Some(prompt) = options.system_prompt {
            accountant.load_system_prompt(prompt)?;
        }

        info!(
            model = accountant.model.as_str(),
            transport = accountant.transport.name(),
            max_input_tokens = ?accountant.max_input_tokens,
            "accountant initialized"
        );
        Ok(accountant)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_input_tokens(&self) -> Option<usize> {
        self.max_input_tokens
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// The currently stored system prompt.
    pub fn system_prompt(&self) -> Option<Arc<SystemPrompt>> {
        self.system_prompt.load_full()
    }

    /// Tokenizes and stores a system prompt.
    ///
    /// Fails with [`TollgateError::BudgetExceeded`] if the prompt alone is
    /// over the input ceiling. On any failure the previous prompt stays.
    pub fn load_system_prompt(&self, text: impl Into<String>) -> Result<(), TollgateError> {
        let text = text.into();
        let tokens = self.tokenizer.count_tokens(&self.model, &text)?;

        if let Some(limit) = self.max_input_tokens {
            if tokens > limit {
                return Err(TollgateError::BudgetExceeded {
                    message: SYSTEM_PROMPT_TOO_LARGE.to_string(),
                    projected: tokens,
                    limit,
                });
            }
        }

        debug!(tokens, "system prompt loaded");
        self.system_prompt
            .store(Some(Arc::new(SystemPrompt::new(text, tokens))));
        Ok(())
    }

    /// Counts tokens for `text` with the configured model's tokenizer.
    pub fn count_tokens(&self, text: &str) -> Result<usize, TollgateError> {
        self.tokenizer.count_tokens(&self.model, text)
    }

    /// Swaps in a new price table for subsequent calls.
    ///
    /// The table is not required to price the configured model; calls made
    /// while the model is unpriced return envelopes without a cost.
    pub fn replace_prices(&self, prices: Arc<PriceTable>) {
        self.prices.store(prices);
    }

    /// Sends `prompt` with the given output contract and accounts for it.
    ///
    /// The input ceiling is checked before the transport is called. Tokenizer,
    /// transport and schema failures come back as
    /// [`TollgateError::Processing`].
    pub async fn process(
        &self,
        prompt: &str,
        options: ProcessOptions,
    ) -> Result<ResponseEnvelope<serde_json::Value>, TollgateError> {
        let snapshot = self.system_prompt.load_full();

        let user_tokens = self
            .tokenizer
            .count_tokens(&self.model, prompt)
            .map_err(TollgateError::into_processing)?;
        let system_tokens = snapshot.as_ref().map_or(0, |p| p.tokens());
        let projected = system_tokens.saturating_add(user_tokens);
        debug!(tokens = user_tokens, projected, "user prompt tokenized");

        if let Some(limit) = self.max_input_tokens {
            if projected > limit {
                return Err(TollgateError::BudgetExceeded {
                    message: PROMPT_TOO_LARGE.to_string(),
                    projected,
                    limit,
                });
            }
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(snapshot.as_deref(), prompt),
            temperature: options.temperature.unwrap_or(0.0),
            max_output_tokens: self.max_output_tokens,
            user: options.user.or_else(|| self.default_user.clone()),
            output: options.output,
        };

        let result = self
            .transport
            .complete(request)
            .await
            .map_err(TollgateError::into_processing)?;

        let split = UsageSplit::from_raw(result.usage);
        debug!(
            total_tokens = split.total_tokens(),
            exact_split = split.is_exact(),
            "request completed"
        );

        let cost = calculate_cost(
            &self.prices.load(),
            &self.model,
            split.input_tokens(),
            split.output_tokens(),
        );

        Ok(ResponseEnvelope {
            id: result.id,
            created_at: chrono::Utc::now(),
            data: result.parsed,
            raw_response: result.raw,
            usage: split.into_token_usage(cost),
        })
    }

    /// Like [`process`](Self::process), with the payload deserialized into `T`.
    pub async fn process_as<T: DeserializeOwned>(
        &self,
        prompt: &str,
        options: ProcessOptions,
    ) -> Result<ResponseEnvelope<T>, TollgateError> {
        let envelope = self.process(prompt, options).await?;
        let data: T = serde_json::from_value(envelope.data).map_err(|e| {
            TollgateError::Schema(format!("payload does not match the requested type: {e}"))
                .into_processing()
        })?;

        Ok(ResponseEnvelope {
            id: envelope.id,
            created_at: envelope.created_at,
            data,
            raw_response: envelope.raw_response,
            usage: envelope.usage,
        })
    }
}

/// System message first when a non-empty prompt is stored, then the user message.
fn build_messages(system: Option<&SystemPrompt>, prompt: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.is_empty()) {
        messages.push(Message::system(system.text()));
    }
    messages.push(Message::user(prompt));
    messages
}
