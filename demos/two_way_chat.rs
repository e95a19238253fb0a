//! Interactive two-agent chat: an assistant drafts, a human steers.
//!
//! The human is consulted before every user turn; an empty line or `exit`
//! ends the session. The scripted client stands in for a real model; any
//! `ModelClient` implementation plugs into the same seam.

use std::sync::Arc;

use parley::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ParleyConfig::from_env();

    let model = Arc::new(ScriptedClient::texts([
        "Here is a plan for plotting META and TESLA stock price change.",
        "Adjusted the plan based on your feedback.",
        "Final version of the plan.",
    ]));
    let mut assistant = Agent::new("Assistant")
        .with_model(model)
        .with_settings(config.settings());
    let mut user = Agent::new("user")
        .with_human_input(Arc::new(StdioInput))
        .with_human_input_mode(HumanInputMode::Always)
        .with_max_auto_replies(0);

    let outcome = PairChat::new()
        .with_max_rounds(7)
        .run(
            &mut user,
            &mut assistant,
            "Plot a chart of META and TESLA stock price change",
        )
        .await?;

    for msg in outcome.transcript.messages() {
        println!("[{}] {}", msg.sender.as_deref().unwrap_or("?"), msg.text());
    }
    println!("\nended: {:?}", outcome.end());
    Ok(())
}
