// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token-budget enforcement and usage/cost reconciliation.
//!
//! The [`Accountant`] sits in front of a [`CompletionTransport`]: it refuses
//! requests whose system + user prompt would exceed the input-token
//! ceiling, forwards the rest, and turns the service's usage report into a
//! normalized [`ResponseEnvelope`] with an optional cost breakdown.
//!
//! [`CompletionTransport`]: tollgate_core::CompletionTransport
//! [`ResponseEnvelope`]: tollgate_core::ResponseEnvelope

pub mod accountant;
pub mod options;
pub mod prompt;
pub mod usage;

pub use accountant::Accountant;
pub use options::{API_KEY_ENV, AccountantOptions, ProcessOptions, resolve_api_key};
pub use prompt::{SystemPrompt, resolve_system_prompt};
pub use usage::UsageSplit;
