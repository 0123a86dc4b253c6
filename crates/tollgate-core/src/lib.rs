// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tollgate token accountant.
//!
//! This crate provides the error type, the request/response types shared by
//! every other crate, and the collaborator traits ([`Tokenizer`],
//! [`CompletionTransport`]) the accountant is built against.

pub mod error;
pub mod tiktoken;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, TollgateError};
pub use tiktoken::TiktokenTokenizer;
pub use traits::{CompletionTransport, Tokenizer};
pub use types::{
    CompletionRequest, CompletionResult, CostBreakdown, Message, OutputContract,
    ResponseEnvelope, RawUsage, Role, TokenUsage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_exported() {
        fn _assert_tokenizer<T: Tokenizer>() {}
        fn _assert_transport<T: CompletionTransport>() {}
        _assert_tokenizer::<TiktokenTokenizer>();
    }

    #[test]
    fn traits_are_object_safe() {
        let tokenizer: Box<dyn Tokenizer> = Box::new(TiktokenTokenizer::new());
        assert_eq!(tokenizer.count_tokens("gpt-4o", "").unwrap(), 0);
        fn _takes_transport(_t: &dyn CompletionTransport) {}
    }
}
