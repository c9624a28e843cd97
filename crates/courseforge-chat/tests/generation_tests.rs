//! Course generation workflow tests.

use std::sync::Arc;

use courseforge_chat::{CourseGenerator, GenerationFailure};
use courseforge_core::{SequencePicker, ToolFailure};
use courseforge_llm::GatewayError;
use courseforge_testing::{MockGateway, sample_course_args, seeded_catalog, text_reply, tool_call_reply};
use courseforge_tools::{CREATE_COURSE_TOOL, CatalogToolRegistry};
use serde_json::json;

const SEEDED_COURSES: i64 = 3;

fn generator(gateway: MockGateway) -> (CourseGenerator, Arc<MockGateway>, courseforge_catalog::CatalogStore) {
    let gateway = Arc::new(gateway);
    let catalog = seeded_catalog();
    let registry = Arc::new(CatalogToolRegistry::creation(
        catalog.clone(),
        Arc::new(SequencePicker::zeros()),
    ));
    (
        CourseGenerator::new(gateway.clone(), registry, catalog.clone()),
        gateway,
        catalog,
    )
}

#[tokio::test]
async fn tool_call_creates_a_published_course() {
    let gateway =
        MockGateway::new().reply_with(tool_call_reply("tu_1", CREATE_COURSE_TOOL, sample_course_args()));
    let (generator, _, catalog) = generator(gateway);

    let created = generator
        .generate("Beginner course on HTTP caching, 5 lessons", None)
        .await
        .unwrap();

    assert_eq!(created.lessons_created, 5);
    assert_eq!(created.course["status"], "published");
    assert_eq!(created.course["level"], "beginner");
    assert!(created.message.contains("HTTP Caching for Beginners"));

    let counts = catalog.course_counts().unwrap();
    assert_eq!(counts.total, SEEDED_COURSES + 1);
    assert_eq!(counts.ai_generated, 1);
}

#[tokio::test]
async fn text_only_reply_is_a_policy_failure() {
    let gateway = MockGateway::new().reply_with(text_reply(
        "Here is a great course idea: HTTP caching in five lessons...",
    ));
    let (generator, _, catalog) = generator(gateway);

    let failure = generator
        .generate("Beginner course on HTTP caching", None)
        .await
        .unwrap_err();

    match &failure {
        GenerationFailure::ToolNotInvoked { ai_response } => {
            assert!(ai_response.contains("course idea"));
        }
        other => panic!("expected ToolNotInvoked, got {other:?}"),
    }
    // Text alone never creates rows.
    assert_eq!(catalog.course_counts().unwrap().total, SEEDED_COURSES);
}

#[tokio::test]
async fn failing_tool_call_is_distinguished_from_no_call() {
    let gateway = MockGateway::new().reply_with(tool_call_reply(
        "tu_1",
        CREATE_COURSE_TOOL,
        json!({"title": "Missing everything else"}),
    ));
    let (generator, _, catalog) = generator(gateway);

    let failure = generator.generate("broken", None).await.unwrap_err();
    assert!(matches!(
        failure,
        GenerationFailure::ToolFailed {
            reason: ToolFailure::InvalidArguments { .. },
            ..
        }
    ));
    assert_eq!(catalog.course_counts().unwrap().total, SEEDED_COURSES);
}

#[tokio::test]
async fn gateway_failure_is_reported_as_such() {
    let gateway = MockGateway::new().fail_with(GatewayError::Connection {
        message: "refused".into(),
    });
    let (generator, _, _) = generator(gateway);

    let failure = generator.generate("anything", None).await.unwrap_err();
    assert!(matches!(failure, GenerationFailure::Gateway { .. }));
    assert_eq!(failure.ai_response(), "");
}

#[tokio::test]
async fn system_prompt_is_grounded_in_the_catalog() {
    let gateway = MockGateway::new()
        .reply_with(tool_call_reply("tu_1", CREATE_COURSE_TOOL, sample_course_args()));
    let (generator, gateway, _) = generator(gateway);

    generator
        .generate("Beginner course on HTTP caching", Some("i2"))
        .await
        .unwrap();

    let request = &gateway.requests()[0];
    assert!(request.system.contains("MUST call the create_course_with_lessons"));
    assert!(request.system.contains("Programming"));
    assert!(request.system.contains("Rust Fundamentals"));
    // Only the creation tool is declared for this workflow.
    assert_eq!(request.tools.len(), 1);
    assert_eq!(request.tools[0].name, CREATE_COURSE_TOOL);
    // The requested instructor travels in the user prompt.
    assert!(matches!(
        &request.turns[0].content[0],
        courseforge_llm::ContentPart::Text { text } if text.contains("'i2'")
    ));
}

#[tokio::test]
async fn accumulated_text_accompanies_a_successful_creation() {
    let mut events = text_reply("Creating your course now.");
    events.pop(); // drop the end_turn terminal
    events.extend(tool_call_reply("tu_1", CREATE_COURSE_TOOL, sample_course_args()));
    let gateway = MockGateway::new().reply_with(events);
    let (generator, _, _) = generator(gateway);

    let created = generator.generate("HTTP caching please", None).await.unwrap();
    assert_eq!(created.ai_response, "Creating your course now.");
}
