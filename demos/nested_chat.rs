//! Nested reflection: a critic reviews each draft before the user's reply
//! goes back to the writer.

use std::sync::Arc;

use parley::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ParleyConfig::from_env();

    let mut writer = Agent::new("Writer")
        .with_system_prompt(
            "You are a professional writer, known for your insightful and engaging articles. \
             You transform complex concepts into compelling narratives and improve the quality \
             of the content based on the feedback from the user.",
        )
        .with_model(Arc::new(ScriptedClient::texts([
            "Meta connects billions; here is a first draft about how.",
            "Second draft, tightened per the critique.",
        ])))
        .with_settings(config.settings());

    let critic = Agent::new("Critic")
        .with_system_prompt(
            "You are a critic, known for your thoroughness and commitment to standards. \
             Scrutinize content for any harmful elements or regulatory violations.",
        )
        .with_model(Arc::new(ScriptedClient::texts([
            "Add sources for the user numbers and soften the second claim.",
        ])))
        .with_settings(config.settings());

    let mut user = Agent::new("User")
        .with_termination(TerminationPolicy::contains_marker("TERMINATE"));

    let nested = NestedChat::new("User", critic)
        .with_message(|_, history, _| {
            format!(
                "Reflect and provide critique on the following writing.\n\n{}",
                history.last().map(|m| m.text()).unwrap_or_default()
            )
        })
        .with_summary_method(SummaryMethod::LastMessage)
        .with_max_rounds(2);

    let outcome = PairChat::new()
        .with_max_rounds(4)
        .with_nested(nested)
        .run(
            &mut user,
            &mut writer,
            "Write a concise but engaging blogpost about Meta.",
        )
        .await?;

    for msg in outcome.transcript.messages() {
        println!("[{}] {}", msg.sender.as_deref().unwrap_or("?"), msg.text());
    }
    println!("\nsummary: {}", outcome.summary);
    Ok(())
}
