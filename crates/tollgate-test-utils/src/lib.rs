// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tollgate integration tests.
//!
//! Provides a mock transport, a deterministic tokenizer and a harness for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockTransport`] - Mock completion transport with queued results
//! - [`WordTokenizer`] - One token per whitespace-separated word
//! - [`TestHarness`] - Accountant wired to both

pub mod harness;
pub mod mock_transport;
pub mod word_tokenizer;

pub use harness::{TEST_MODEL, TestHarness};
pub use mock_transport::{MockTransport, mock_result};
pub use word_tokenizer::WordTokenizer;
