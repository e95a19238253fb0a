//! Group chat with a manager choosing each speaker.

use std::sync::Arc;

use parley::model::RepeatingClient;
use parley::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ParleyConfig::from_env();

    let agents = vec![
        Agent::new("Admin")
            .with_system_prompt(
                "A human admin. Interact with the planner to discuss the plan. Plan execution \
                 needs to be approved by this admin.",
            )
            .with_termination(TerminationPolicy::contains_marker("TERMINATE")),
        Agent::new("Engineer")
            .with_system_prompt(
                "Engineer. You follow an approved plan. You write python/shell code to solve \
                 tasks and save it to disk.",
            )
            .with_model(Arc::new(RepeatingClient::text(
                "Saved fetch_papers.py to disk.",
            )))
            .with_settings(config.settings()),
        Agent::new("Scientist")
            .with_system_prompt(
                "Scientist. You follow an approved plan. You categorize papers after seeing \
                 their abstracts. You don't write code.",
            )
            .with_model(Arc::new(RepeatingClient::text(
                "Categorized the abstracts into a markdown table.",
            )))
            .with_settings(config.settings()),
        Agent::new("Planner")
            .with_system_prompt(
                "Planner. Suggest a plan and revise it based on feedback from admin and critic, \
                 until admin approval.",
            )
            .with_model(Arc::new(RepeatingClient::text(
                "Plan: engineer fetches papers, scientist categorizes them.",
            )))
            .with_settings(config.settings()),
        Agent::new("Critic")
            .with_system_prompt(
                "Critic. Double check plan, claims, code from other agents and provide feedback.",
            )
            .with_model(Arc::new(RepeatingClient::text(
                "Looks solid; include source URLs.",
            )))
            .with_settings(config.settings()),
    ];

    // A scripted manager; a ManagerSelect over a real model makes the same
    // decision from the conversation history.
    let manager = ManagerSelect::new(Arc::new(ScriptedClient::texts([
        "Planner", "Critic", "Planner", "Engineer", "Scientist", "Planner", "Engineer",
        "Scientist", "Critic", "Planner", "Engineer",
    ])));

    let mut group = GroupChat::new(agents)
        .with_selector(Arc::new(manager))
        .with_max_rounds(12);

    let outcome = group
        .run(
            "Admin",
            "Find papers on LLM applications from arxiv in the last week, create a markdown \
             table of different domains.",
        )
        .await?;

    for msg in outcome.transcript.messages() {
        println!("[{}] {}", msg.sender.as_deref().unwrap_or("?"), msg.text());
    }
    println!("\nended: {:?}", outcome.end());
    Ok(())
}
