// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for budget enforcement and usage reconciliation.

use std::sync::Arc;

use proptest::prelude::*;
use schemars::JsonSchema;
use serde::Deserialize;
use tollgate_accountant::{Accountant, AccountantOptions, ProcessOptions};
use tollgate_core::{ErrorKind, Role, TiktokenTokenizer, TollgateError};
use tollgate_cost::PriceTable;
use tollgate_test_utils::{MockTransport, TestHarness, WordTokenizer, mock_result};

#[tokio::test]
async fn gpt_4o_mini_cost_reconciliation() {
    let harness = TestHarness::builder()
        .with_results(vec![mock_result(serde_json::json!({"ok": true}), 1000, Some(200))])
        .build()
        .unwrap();

    let envelope = harness.process("what does this cost").await.unwrap();

    assert_eq!(envelope.usage.input_tokens, 800);
    assert_eq!(envelope.usage.output_tokens, 200);
    assert_eq!(envelope.usage.total_tokens, 1000);
    let cost = envelope.usage.cost.expect("gpt-4o-mini is priced");
    assert_eq!(cost.input_cost, 0.00012);
    assert_eq!(cost.output_cost, 0.00012);
    assert_eq!(cost.total_cost, 0.00024);
    assert_eq!(cost.currency, "USD");
}

#[tokio::test]
async fn total_only_usage_counts_everything_as_input() {
    let harness = TestHarness::builder()
        .with_results(vec![mock_result(serde_json::json!({}), 1000, None)])
        .build()
        .unwrap();

    let envelope = harness.process("ping").await.unwrap();
    assert_eq!(envelope.usage.input_tokens, 1000);
    assert_eq!(envelope.usage.output_tokens, 0);
    assert_eq!(envelope.usage.total_tokens, 1000);
}

#[tokio::test]
async fn budget_exceeded_before_transport() {
    let harness = TestHarness::builder()
        .with_max_input_tokens(10)
        .with_system_prompt("one two three four five six seven eight")
        .build()
        .unwrap();

    let err = harness.process("a b c d e").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetExceeded);
    assert!(
        err.to_string()
            .contains("prompt (system+user) is larger than the max number of input tokens allowed"),
        "got: {err}"
    );
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn budget_at_exact_limit_is_allowed() {
    let harness = TestHarness::builder()
        .with_max_input_tokens(10)
        .with_system_prompt("one two three four five")
        .build()
        .unwrap();

    harness.process("a b c d e").await.unwrap();
    assert_eq!(harness.transport.call_count(), 1);
}

#[tokio::test]
async fn no_system_prompt_sends_single_user_message() {
    let harness = TestHarness::builder()
        .with_max_input_tokens(100)
        .build()
        .unwrap();

    harness.process("ping").await.unwrap();

    let request = harness.transport.last_request().await.unwrap();
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    assert_eq!(request.messages[0].content, "ping");
}

#[tokio::test]
async fn failed_reload_keeps_prompt_used_by_process() {
    let harness = TestHarness::builder()
        .with_max_input_tokens(4)
        .with_system_prompt("be terse")
        .build()
        .unwrap();

    let err = harness
        .accountant
        .load_system_prompt("this prompt is far too long")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetExceeded);

    harness.process("ping").await.unwrap();
    let request = harness.transport.last_request().await.unwrap();
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, "be terse");
}

#[tokio::test]
async fn reload_applies_to_later_calls() {
    let harness = TestHarness::builder()
        .with_system_prompt("first prompt")
        .build()
        .unwrap();

    harness.process("ping").await.unwrap();
    harness.accountant.load_system_prompt("second prompt").unwrap();
    harness.process("ping").await.unwrap();

    let requests = harness.transport.requests().await;
    assert_eq!(requests[0].messages[0].content, "first prompt");
    assert_eq!(requests[1].messages[0].content, "second prompt");
}

#[tokio::test]
async fn unpriced_model_yields_envelope_without_cost() {
    let harness = TestHarness::builder()
        .with_results(vec![mock_result(serde_json::json!({}), 50, Some(10))])
        .build()
        .unwrap();
    harness.accountant.replace_prices(Arc::new(PriceTable::empty()));

    let envelope = harness.process("ping").await.unwrap();
    assert_eq!(envelope.usage.input_tokens, 40);
    assert!(envelope.usage.cost.is_none());

    let json = serde_json::to_value(&envelope.usage).unwrap();
    assert!(json.get("cost").is_none());
}

#[tokio::test]
async fn tokenizer_failure_is_processing_error() {
    let harness = TestHarness::builder()
        .with_tokenizer(WordTokenizer::rejecting("gpt-4o-mini"))
        .build()
        .unwrap();

    let err = harness.process("ping").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Processing);
    assert!(err.to_string().contains("no encoding for model"), "got: {err}");
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn tokenizer_failure_during_construction_is_not_wrapped() {
    let result = TestHarness::builder()
        .with_tokenizer(WordTokenizer::rejecting("gpt-4o-mini"))
        .with_system_prompt("be terse")
        .build();

    let err = result.err().expect("construction should fail");
    assert_eq!(err.kind(), ErrorKind::Tokenizer);
}

#[tokio::test]
async fn transport_failure_is_processing_error() {
    let harness = TestHarness::builder().build().unwrap();
    harness
        .transport
        .push_error(TollgateError::Schema("response does not match schema".into()))
        .await;

    let err = harness.process("ping").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Processing);
    assert!(err.to_string().starts_with("error processing request:"));
    assert!(err.to_string().contains("response does not match schema"));
}

#[tokio::test]
async fn envelope_carries_transport_payloads() {
    let result = mock_result(serde_json::json!({"answer": 42}), 12, Some(2));
    let id = result.id.clone();
    let harness = TestHarness::builder()
        .with_results(vec![result])
        .build()
        .unwrap();

    let before = chrono::Utc::now();
    let envelope = harness.process("ping").await.unwrap();
    assert_eq!(envelope.id, id);
    assert_eq!(envelope.data["answer"], 42);
    assert_eq!(envelope.raw_response["id"], id.as_str());
    assert!(envelope.created_at >= before);
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Sentiment {
    label: String,
    score: f64,
}

#[tokio::test]
async fn process_as_deserializes_payload() {
    let harness = TestHarness::builder()
        .with_results(vec![mock_result(
            serde_json::json!({"label": "positive", "score": 0.9}),
            20,
            Some(5),
        )])
        .build()
        .unwrap();

    let envelope = harness
        .accountant
        .process_as::<Sentiment>("great product", ProcessOptions::for_type::<Sentiment>())
        .await
        .unwrap();
    assert_eq!(envelope.data.label, "positive");
    assert_eq!(envelope.data.score, 0.9);

    let request = harness.transport.last_request().await.unwrap();
    assert_eq!(request.output.effective_name(), "Sentiment");
}

#[tokio::test]
async fn process_as_mismatch_is_processing_error() {
    let harness = TestHarness::builder()
        .with_results(vec![mock_result(serde_json::json!({"label": 3}), 20, Some(5))])
        .build()
        .unwrap();

    let err = harness
        .accountant
        .process_as::<Sentiment>("meh", ProcessOptions::for_type::<Sentiment>())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Processing);
}

#[tokio::test]
async fn concurrent_calls_share_one_accountant() {
    let harness = TestHarness::builder()
        .with_system_prompt("be terse")
        .build()
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let accountant = harness.accountant.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                accountant.load_system_prompt(format!("prompt number {i}")).unwrap();
            }
            accountant
                .process(
                    "ping",
                    ProcessOptions::new(tollgate_core::OutputContract::new(
                        serde_json::json!({"type": "object"}),
                    )),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(harness.transport.call_count(), 8);
    for request in harness.transport.requests().await {
        assert_eq!(request.messages.len(), 2);
        let system = &request.messages[0].content;
        assert!(system == "be terse" || system.starts_with("prompt number "));
    }
}

#[test]
fn tiktoken_backed_accountant_counts_tokens() {
    let accountant = Accountant::with_collaborators(
        AccountantOptions::new("gpt-4o-mini")
            .with_api_key("sk-test")
            .with_system_prompt("You are a helpful assistant."),
        Arc::new(PriceTable::openai_default()),
        Arc::new(MockTransport::new()),
        Arc::new(TiktokenTokenizer::new()),
    )
    .unwrap();

    let stored = accountant.system_prompt().unwrap();
    assert!(stored.tokens() > 0);
    assert_eq!(
        accountant.count_tokens(stored.text()).unwrap(),
        stored.tokens()
    );
}

proptest! {
    #[test]
    fn budget_decision_matches_word_counts(
        system_words in 0usize..20,
        user_words in 1usize..20,
        limit in 1usize..40,
    ) {
        prop_assume!(system_words <= limit);

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let harness = TestHarness::builder()
            .with_max_input_tokens(limit)
            .with_system_prompt(vec!["s"; system_words].join(" "))
            .build()
            .unwrap();
        let prompt = vec!["u"; user_words].join(" ");

        let result = runtime.block_on(harness.process(&prompt));
        if system_words + user_words > limit {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::BudgetExceeded);
            prop_assert_eq!(harness.transport.call_count(), 0);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(harness.transport.call_count(), 1);
        }
    }
}
