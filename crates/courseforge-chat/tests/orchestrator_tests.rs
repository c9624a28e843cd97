//! Chat workflow tests against a scripted gateway and a real in-memory
//! catalog.

use std::sync::Arc;

use courseforge_chat::{ChatError, ChatOrchestrator, ChatUpdate};
use courseforge_core::ChatMessage;
use courseforge_llm::{ContentPart, GatewayError, GatewayEvent, StopReason, TurnRole};
use courseforge_testing::{MockGateway, seeded_catalog, text_reply, tool_call_reply};
use courseforge_tools::CatalogToolRegistry;
use serde_json::json;
use tokio::sync::mpsc;

fn orchestrator(gateway: MockGateway) -> (ChatOrchestrator, Arc<MockGateway>) {
    let gateway = Arc::new(gateway);
    let registry = Arc::new(CatalogToolRegistry::read_only(seeded_catalog()));
    (
        ChatOrchestrator::new(gateway.clone(), registry),
        gateway,
    )
}

async fn collect_updates(rx: &mut mpsc::Receiver<ChatUpdate>) -> Vec<ChatUpdate> {
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn text_only_turn_completes() {
    let (orchestrator, _) = orchestrator(MockGateway::new().reply_with(text_reply("Hello!")));
    let (tx, mut rx) = mpsc::channel(32);

    orchestrator
        .run(&[ChatMessage::user("hi")], None, tx)
        .await
        .unwrap();

    let updates = collect_updates(&mut rx).await;
    assert_eq!(
        updates,
        vec![
            ChatUpdate::Text {
                text: "Hello!".into()
            },
            ChatUpdate::Completed,
        ]
    );
}

#[tokio::test]
async fn tool_call_is_dispatched_and_fed_back() {
    let gateway = MockGateway::new()
        .reply_with(tool_call_reply("tu_1", "list_categories", json!({})))
        .reply_with(text_reply("We have three categories."));
    let (orchestrator, gateway) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(32);

    orchestrator
        .run(&[ChatMessage::user("what categories exist?")], None, tx)
        .await
        .unwrap();

    let updates = collect_updates(&mut rx).await;
    assert!(matches!(&updates[0], ChatUpdate::ToolCall { name, .. } if name == "list_categories"));
    match &updates[1] {
        ChatUpdate::ToolResult { name, output, .. } => {
            assert_eq!(name, "list_categories");
            assert_eq!(output["total"], 3);
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(
        &updates[2..],
        &[
            ChatUpdate::Text {
                text: "We have three categories.".into()
            },
            ChatUpdate::Completed,
        ]
    );

    // Second request carries the tool exchange in its context.
    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    let resumed = &requests[1];
    assert_eq!(resumed.turns.len(), 3);
    assert_eq!(resumed.turns[1].role, TurnRole::Assistant);
    assert!(matches!(
        resumed.turns[1].content[0],
        ContentPart::ToolUse { .. }
    ));
    match &resumed.turns[2].content[0] {
        ContentPart::ToolResult { tool_use_id, content } => {
            assert_eq!(tool_use_id, "tu_1");
            assert!(content.contains("categories"));
        }
        other => panic!("expected tool result part, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_tool_becomes_a_structured_failure() {
    let gateway = MockGateway::new()
        .reply_with(tool_call_reply("tu_9", "delete_everything", json!({})))
        .reply_with(text_reply("I cannot do that."));
    let (orchestrator, _) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(32);

    orchestrator
        .run(&[ChatMessage::user("wipe it")], None, tx)
        .await
        .unwrap();

    let updates = collect_updates(&mut rx).await;
    match &updates[1] {
        ChatUpdate::ToolResult { output, .. } => {
            assert_eq!(output["success"], false);
            assert_eq!(output["error"], "not_found");
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(updates.last(), Some(&ChatUpdate::Completed));
}

#[tokio::test]
async fn empty_conversation_is_rejected_before_streaming() {
    let (orchestrator, gateway) = orchestrator(MockGateway::new());
    let (tx, mut rx) = mpsc::channel(32);

    let err = orchestrator.run(&[], None, tx).await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyConversation));
    assert_eq!(gateway.request_count(), 0);
    assert!(collect_updates(&mut rx).await.is_empty());
}

#[tokio::test]
async fn gateway_failure_surfaces_as_error_update() {
    let gateway = MockGateway::new().fail_with(GatewayError::Unauthorized { status: 401 });
    let (orchestrator, _) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(32);

    let err = orchestrator
        .run(&[ChatMessage::user("hi")], None, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Gateway(_)));

    let updates = collect_updates(&mut rx).await;
    assert!(matches!(updates.last(), Some(ChatUpdate::Error { .. })));
}

#[tokio::test]
async fn stream_error_event_fails_the_turn() {
    let gateway = MockGateway::new().reply_with(vec![
        GatewayEvent::TextFragment {
            text: "partial".into(),
        },
        GatewayEvent::Error {
            message: "overloaded".into(),
        },
    ]);
    let (orchestrator, _) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(32);

    let err = orchestrator
        .run(&[ChatMessage::user("hi")], None, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Stream { .. }));

    let updates = collect_updates(&mut rx).await;
    assert_eq!(
        updates[0],
        ChatUpdate::Text {
            text: "partial".into()
        }
    );
    assert!(matches!(
        updates.last(),
        Some(ChatUpdate::Error { message }) if message == "overloaded"
    ));
}

#[tokio::test]
async fn model_override_is_passed_through() {
    let (orchestrator, gateway) = orchestrator(MockGateway::new().reply_with(text_reply("ok")));
    let (tx, _rx) = mpsc::channel(32);

    orchestrator
        .run(
            &[ChatMessage::user("hi")],
            Some("claude-haiku".into()),
            tx,
        )
        .await
        .unwrap();

    assert_eq!(gateway.requests()[0].model.as_deref(), Some("claude-haiku"));
}

#[tokio::test]
async fn tool_rounds_are_bounded() {
    let mut gateway = MockGateway::new();
    for _ in 0..10 {
        gateway = gateway.reply_with(tool_call_reply("tu_n", "list_categories", json!({})));
    }
    let (orchestrator, _) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(256);

    let err = orchestrator
        .run(&[ChatMessage::user("loop forever")], None, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ToolRoundsExceeded { .. }));
    assert!(matches!(
        collect_updates(&mut rx).await.last(),
        Some(ChatUpdate::Error { .. })
    ));
}

#[tokio::test]
async fn done_with_tool_use_but_no_calls_completes() {
    let gateway = MockGateway::new().reply_with(vec![
        GatewayEvent::TextFragment { text: "hm".into() },
        GatewayEvent::Done {
            stop_reason: StopReason::ToolUse,
        },
    ]);
    let (orchestrator, _) = orchestrator(gateway);
    let (tx, mut rx) = mpsc::channel(32);

    orchestrator
        .run(&[ChatMessage::user("hi")], None, tx)
        .await
        .unwrap();
    assert_eq!(collect_updates(&mut rx).await.last(), Some(&ChatUpdate::Completed));
}
