// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the accountant.
//!
//! Transports use `#[async_trait]` so they can be held as trait objects.

pub mod tokenizer;
pub mod transport;

pub use tokenizer::Tokenizer;
pub use transport::CompletionTransport;
