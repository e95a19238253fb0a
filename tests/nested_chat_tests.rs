//! Tests for nested reflection chats.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use parley::model::{FailingClient, ScriptedClient};
use parley::prelude::*;

fn writer() -> Agent {
    Agent::new("Writer")
        .with_system_prompt("You are a professional writer.")
        .with_model(Arc::new(ScriptedClient::texts([
            "draft one",
            "draft two, improved",
        ])))
}

#[tokio::test]
async fn nested_critique_is_injected_as_the_trigger_reply() {
    let critic = Agent::new("Critic").with_model(Arc::new(ScriptedClient::texts([
        "needs more detail",
    ])));
    let mut writer = writer();
    let mut user = Agent::new("User");

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
        .await
        .unwrap();

    let msgs = outcome.transcript.messages();
    // task, draft, injected critique, improved draft
    assert_eq!(outcome.transcript.round_count(), 4);
    assert_eq!(msgs[2].text(), "needs more detail");
    assert_eq!(msgs[2].sender.as_deref(), Some("User"));
    assert_eq!(msgs[3].text(), "draft two, improved");
}

#[tokio::test]
async fn zero_round_nested_chat_injects_an_empty_reply() {
    let critic = Agent::new("Critic").with_model(Arc::new(ScriptedClient::texts(["unused"])));
    let mut writer = writer();
    let mut user = Agent::new("User");

    let nested = NestedChat::new("User", critic).with_max_rounds(0);

    let outcome = PairChat::new()
        .with_max_rounds(3)
        .with_nested(nested)
        .run(&mut user, &mut writer, "Write a blogpost.")
        .await
        .unwrap();

    let msgs = outcome.transcript.messages();
    // The outer session still advanced exactly one round on the trigger turn.
    assert_eq!(outcome.transcript.round_count(), 3);
    assert_eq!(msgs[2].text(), "");
    assert_eq!(msgs[2].sender.as_deref(), Some("User"));
}

#[tokio::test]
async fn nested_rounds_do_not_count_against_the_outer_session() {
    let critic = Agent::new("Critic").with_model(Arc::new(ScriptedClient::texts([
        "tighten the intro",
        "good enough now",
        "unused third pass",
    ])));
    let mut writer = writer();
    let mut user = Agent::new("User");

    // Nested budget of 5 lets the inner chat run several rounds; the outer
    // session still only advances once per injected reply.
    let nested = NestedChat::new("User", critic).with_max_rounds(5);

    let outcome = PairChat::new()
        .with_max_rounds(3)
        .with_nested(nested)
        .run(&mut user, &mut writer, "Write a blogpost.")
        .await
        .unwrap();

    assert_eq!(outcome.transcript.round_count(), 3);
    assert_eq!(outcome.end(), Some(&SessionEnd::RoundLimit));
}

#[tokio::test]
async fn reflection_summary_condenses_the_nested_chat() {
    let critic = Agent::new("Critic").with_model(Arc::new(ScriptedClient::texts([
        "point one; point two",
        "shorten the middle section",
    ])));
    let mut writer = writer();
    let mut user = Agent::new("User");

    let nested = NestedChat::new("User", critic)
        .with_summary_method(SummaryMethod::Reflection)
        .with_max_rounds(2);

    let outcome = PairChat::new()
        .with_max_rounds(3)
        .with_nested(nested)
        .run(&mut user, &mut writer, "Write a blogpost.")
        .await
        .unwrap();

    // The second scripted reply answers the reflection call.
    assert_eq!(outcome.transcript.messages()[2].text(), "shorten the middle section");
}

#[tokio::test]
async fn failed_nested_chat_fails_the_outer_session() {
    let critic = Agent::new("Critic").with_model(Arc::new(FailingClient::new("model down")));
    let mut writer = writer();
    let mut user = Agent::new("User");

    let nested = NestedChat::new("User", critic);

    let outcome = PairChat::new()
        .with_max_rounds(4)
        .with_nested(nested)
        .run(&mut user, &mut writer, "Write a blogpost.")
        .await
        .unwrap();

    match outcome.end() {
        Some(SessionEnd::Failed { error }) => {
            assert!(error.contains("nested chat"), "unexpected error: {error}");
        }
        other => panic!("expected Failed end, got {other:?}"),
    }
    // Outer history up to the failure is preserved.
    assert_eq!(outcome.transcript.round_count(), 2);
}

#[tokio::test]
async fn nested_trigger_must_name_a_participant() {
    let critic = Agent::new("Critic");
    let mut writer = writer();
    let mut user = Agent::new("User");

    let nested = NestedChat::new("Nobody", critic);

    let err = PairChat::new()
        .with_nested(nested)
        .run(&mut user, &mut writer, "task")
        .await
        .unwrap_err();
    assert!(matches!(err, ParleyError::Configuration(_)));
}
