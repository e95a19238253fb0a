//! Tests for tool registration, schema validation, and in-band errors.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::terminating_proxy;
use parley::model::{ModelReply, ScriptedClient};
use parley::prelude::*;

fn exchange_rate(base: &str, quote: &str) -> Option<f64> {
    match (base, quote) {
        (b, q) if b == q => Some(1.0),
        ("USD", "EUR") => Some(0.92),
        ("EUR", "USD") => Some(1.09),
        _ => None,
    }
}

fn currency_calculator() -> FnTool {
    FnTool::new(
        "currency_calculator",
        "Convert currency between USD and EUR",
        ToolParameters::object()
            .number("base_amount", "Amount of currency in base_currency", true)
            .string_with_default("base_currency", "Base currency (USD or EUR)", "USD")
            .string_with_default("quote_currency", "Quote currency (USD or EUR)", "EUR")
            .build(),
        |args| async move {
            let amount = args
                .get_f64("base_amount")
                .ok_or_else(|| ParleyError::tool("currency_calculator", "base_amount missing"))?;
            let base = args.get_str("base_currency").unwrap_or("USD").to_string();
            let quote = args.get_str("quote_currency").unwrap_or("EUR").to_string();
            let rate = exchange_rate(&base, &quote).ok_or_else(|| {
                ParleyError::tool(
                    "currency_calculator",
                    format!("unsupported currency pair: {base} to {quote}"),
                )
            })?;
            Ok(json!(format!(
                "{amount} {base} = {:.2} {quote} (rate: {rate})",
                rate * amount
            )))
        },
    )
}

#[tokio::test]
async fn registered_tool_answers_the_model_call_in_band() {
    let call = ToolCall::new("currency_calculator", json!({ "base_amount": 100.0 }));
    let mut bot = Agent::new("currency_bot")
        .with_system_prompt("You are a currency exchange assistant.")
        .with_model(Arc::new(ScriptedClient::new([
            ModelReply::tool_call(call),
            ModelReply::text("100 USD is about 92 EUR. TERMINATE"),
        ])));
    let mut user = terminating_proxy("user_proxy");
    register_tool(Arc::new(currency_calculator()), &mut bot, &mut user);

    let outcome = PairChat::new()
        .with_max_rounds(6)
        .run(&mut user, &mut bot, "Convert 100 USD to EUR")
        .await
        .unwrap();

    // opening, tool-call request, tool result, final answer
    let msgs = outcome.transcript.messages();
    assert_eq!(msgs.len(), 4);
    let results = msgs[2].tool_results_parts();
    assert_eq!(results.len(), 1);
    assert!(!results[0].is_error);
    // Defaults filled in the omitted currencies.
    assert_eq!(results[0].result, json!("100 USD = 92.00 EUR (rate: 0.92)"));
    assert_eq!(
        outcome.end(),
        Some(&SessionEnd::TerminalMessage {
            agent: "user_proxy".into()
        })
    );
}

#[tokio::test]
async fn malformed_arguments_become_an_error_result_not_a_crash() {
    let call = ToolCall::new("currency_calculator", json!({ "base_amount": "plenty" }));
    let mut bot = Agent::new("currency_bot").with_model(Arc::new(ScriptedClient::new([
        ModelReply::tool_call(call),
        ModelReply::text("I sent bad arguments, giving up. TERMINATE"),
    ])));
    let mut user = terminating_proxy("user_proxy");
    register_tool(Arc::new(currency_calculator()), &mut bot, &mut user);

    let outcome = PairChat::new()
        .with_max_rounds(6)
        .run(&mut user, &mut bot, "Convert some money")
        .await
        .unwrap();

    let msgs = outcome.transcript.messages();
    let results = msgs[2].tool_results_parts();
    assert!(results[0].is_error);
    let text = results[0].result["error"].as_str().unwrap();
    assert!(text.contains("expected type 'number'"), "got: {text}");
    // The session recovered and ran to its terminal message.
    assert_eq!(
        outcome.end(),
        Some(&SessionEnd::TerminalMessage {
            agent: "user_proxy".into()
        })
    );
}

#[tokio::test]
async fn unknown_tool_calls_are_reported_in_band() {
    let call = ToolCall::new("get_stock_data", json!({ "symbol": "META" }));
    let mut bot = Agent::new("assistant").with_model(Arc::new(ScriptedClient::new([
        ModelReply::tool_call(call),
        ModelReply::text("No such tool then. TERMINATE"),
    ])));
    let mut user = terminating_proxy("user_proxy");
    // Only the weather tool is executable; the model asks for another.
    let weather = FnTool::new(
        "get_weather",
        "Get the current weather for a specific location",
        ToolParameters::object()
            .string("location", "The location", true)
            .build(),
        |args| async move {
            Ok(match args.get_str("location") {
                Some("Florida") => json!("It's hot in Florida!"),
                Some("Maine") => json!("It's cold in Maine"),
                Some(other) => json!(format!("I don't know this place {other}")),
                None => json!("I don't know where you are"),
            })
        },
    );
    register_tool(Arc::new(weather), &mut bot, &mut user);

    let outcome = PairChat::new()
        .with_max_rounds(6)
        .run(&mut user, &mut bot, "What's the stock price of META?")
        .await
        .unwrap();

    let results = outcome.transcript.messages()[2].tool_results_parts();
    assert!(results[0].is_error);
    assert!(results[0].result["error"]
        .as_str()
        .unwrap()
        .contains("not found"));
}

#[tokio::test]
async fn tool_failures_surface_as_error_results_and_the_model_may_retry() {
    let first = ToolCall::new("currency_calculator", json!({ "base_amount": 10.0, "quote_currency": "GBP" }));
    let second = ToolCall::new("currency_calculator", json!({ "base_amount": 10.0 }));
    let mut bot = Agent::new("currency_bot").with_model(Arc::new(ScriptedClient::new([
        ModelReply::tool_call(first),
        ModelReply::tool_call(second),
        ModelReply::text("10 USD is 9.20 EUR. TERMINATE"),
    ])));
    let mut user = terminating_proxy("user_proxy");
    register_tool(Arc::new(currency_calculator()), &mut bot, &mut user);

    let outcome = PairChat::new()
        .with_max_rounds(8)
        .run(&mut user, &mut bot, "Convert 10 USD to GBP, or EUR if you must")
        .await
        .unwrap();

    let msgs = outcome.transcript.messages();
    let first_results = msgs[2].tool_results_parts();
    assert!(first_results[0].is_error);
    assert!(first_results[0].result["error"]
        .as_str()
        .unwrap()
        .contains("unsupported currency pair"));

    let second_results = msgs[4].tool_results_parts();
    assert!(!second_results[0].is_error);
    assert_eq!(
        outcome.end(),
        Some(&SessionEnd::TerminalMessage {
            agent: "user_proxy".into()
        })
    );
}
