//! Function calling: the assistant requests a currency conversion, the
//! user proxy executes it, and the result flows back in-band.

use std::sync::Arc;

use serde_json::json;

use parley::model::ModelReply;
use parley::prelude::*;

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
            let (base, quote) = (
                args.get_str("base_currency").unwrap_or("USD").to_string(),
                args.get_str("quote_currency").unwrap_or("EUR").to_string(),
            );
            let rate = match (base.as_str(), quote.as_str()) {
                (b, q) if b == q => 1.0,
                ("USD", "EUR") => 0.92,
                ("EUR", "USD") => 1.09,
                _ => {
                    return Err(ParleyError::tool(
                        "currency_calculator",
                        format!("unsupported currency pair: {base} to {quote}"),
                    ))
                }
            };
            Ok(json!(format!(
                "{amount} {base} = {:.2} {quote} (rate: {rate})",
                rate * amount
            )))
        },
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ParleyConfig::from_env();

    let call = ToolCall::new("currency_calculator", json!({ "base_amount": 100.0 }));
    let model = Arc::new(ScriptedClient::new([
        ModelReply::tool_call(call),
        ModelReply::text("100 USD is about 92 EUR. TERMINATE"),
    ]));
    let mut currency_bot = Agent::new("currency_bot")
        .with_system_prompt(
            "You are a currency exchange assistant. Use the currency_calculator function to \
             convert between USD and EUR. Always respond with TERMINATE after completing the \
             conversion.",
        )
        .with_model(model)
        .with_settings(config.settings());
    let mut user_proxy = Agent::new("user_proxy")
        .with_termination(TerminationPolicy::contains_marker("TERMINATE"))
        .with_max_auto_replies(3);

    register_tool(Arc::new(currency_calculator()), &mut currency_bot, &mut user_proxy);

    let outcome = PairChat::new()
        .with_max_rounds(5)
        .run(&mut user_proxy, &mut currency_bot, "Convert 100 USD to EUR")
        .await?;

    for msg in outcome.transcript.messages() {
        println!("[{}] {}", msg.sender.as_deref().unwrap_or("?"), msg.text());
        for result in msg.tool_results_parts() {
            println!("  -> {}", result.result);
        }
    }
    println!("\nsummary: {}", outcome.summary);
    Ok(())
}
