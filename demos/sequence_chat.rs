//! Sequential handoffs: three quote sessions, each seeded with the
//! summaries of the ones before it.

use std::sync::Arc;

use parley::prelude::*;

fn quoting_agent(name: &str, quote: &str, reflection: &str) -> Agent {
    Agent::new(name)
        .with_system_prompt(
            "You are an assistant agent who gives quotes. Return 'TERMINATE' when the task is \
             done.",
        )
        .with_model(Arc::new(ScriptedClient::texts([
            format!("{quote} TERMINATE"),
            reflection.to_string(),
        ])))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut user_proxy = Agent::new("user_proxy")
        .with_termination(TerminationPolicy::contains_marker("TERMINATE"))
        .with_max_auto_replies(10);

    let specs = vec![
        ChatSpec::new(
            quoting_agent(
                "assistant1",
                "\"The only way out is through.\"",
                "A Frost quote about perseverance was shared.",
            ),
            "give a quote from a famous author",
        )
        .with_clear_history(true)
        .with_summary_method(SummaryMethod::Reflection),
        ChatSpec::new(
            quoting_agent(
                "assistant2",
                "\"Stay hungry, stay foolish.\"",
                "A Jobs quote about ambition was shared.",
            ),
            "give another quote from a famous author",
        )
        .with_clear_history(true)
        .with_summary_method(SummaryMethod::Reflection),
        ChatSpec::new(
            quoting_agent(
                "assistant3",
                "\"Persevere hungrily, through and beyond.\"",
                "An original quote blending the prior two was composed.",
            ),
            "based on the previous quotes, come up with your own!",
        )
        .with_clear_history(true)
        .with_summary_method(SummaryMethod::Reflection),
    ];

    let summaries = run_chat_sequence(&mut user_proxy, specs).await?;

    for entry in &summaries {
        let status = if entry.completed { "ok" } else { "failed" };
        println!("[{status}] {}: {}", entry.recipient, entry.summary);
    }
    Ok(())
}
