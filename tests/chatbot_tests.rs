use async_trait::async_trait;
use bean_assistant::error::ServiceError;
use bean_assistant::services::file_analysis::UploadedFile;
use bean_assistant::services::page::{Assistant, Block, Event};
use bean_assistant::services::provider::{
    ChatProvider, ImageProvider, PLACEHOLDER_IMAGE_URL, PlaceholderProvider,
};
use bean_assistant::services::session_manager::{Message, MessageRole, Session};
use std::sync::Arc;

struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    async fn complete(&self, _history: &[Message]) -> Result<String, ServiceError> {
        Err(ServiceError::ExternalService("connection refused".into()))
    }
}

#[async_trait]
impl ImageProvider for FailingProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::ExternalService("rate limited".into()))
    }
}

fn chat_turns(blocks: &[Block]) -> Vec<(MessageRole, String)> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::ChatTurn { role, content } => Some((*role, content.clone())),
            _ => None,
        })
        .collect()
}

fn failing_assistant() -> Assistant {
    Assistant::new(Arc::new(FailingProvider), Arc::new(FailingProvider))
}

#[tokio::test]
async fn test_placeholder_history_interleaving() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let inputs = ["hello", "how are you?", "bye"];

    let mut blocks = Vec::new();
    for input in inputs {
        blocks = assistant.run(&mut session, Event::ChatSubmit(input.to_string())).await;
    }

    let expected: Vec<(MessageRole, String)> = inputs
        .iter()
        .flat_map(|i| {
            [
                (MessageRole::User, i.to_string()),
                (MessageRole::Assistant, format!("Echo: {i}")),
            ]
        })
        .collect();
    assert_eq!(chat_turns(&blocks), expected);
    assert_eq!(session.messages().len(), 6);
}

#[tokio::test]
async fn test_empty_chat_input_is_ignored() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant.run(&mut session, Event::ChatSubmit(String::new())).await;

    assert!(session.messages().is_empty());
    assert!(chat_turns(&blocks).is_empty());
    assert!(!blocks.iter().any(Block::is_failure));
}

#[tokio::test]
async fn test_whitespace_chat_input_is_submitted_verbatim() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant.run(&mut session, Event::ChatSubmit(" ".into())).await;

    assert_eq!(session.messages(), &[Message::user(" "), Message::assistant("Echo:  ")]);
    assert_eq!(
        chat_turns(&blocks),
        vec![
            (MessageRole::User, " ".to_string()),
            (MessageRole::Assistant, "Echo:  ".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_whitespace_image_prompt_generates_image() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant
        .run(&mut session, Event::GenerateImage { prompt: "   ".into(), pressed: true })
        .await;

    assert!(blocks.contains(&Block::Image {
        url: PLACEHOLDER_IMAGE_URL.into(),
        caption: "   ".into(),
    }));
    assert!(!blocks.iter().any(Block::is_failure));
}

#[tokio::test]
async fn test_empty_image_prompt_warns() {
    for assistant in [Assistant::placeholder(), failing_assistant()] {
        let mut session = Session::new("s1");
        let blocks = assistant
            .run(&mut session, Event::GenerateImage { prompt: String::new(), pressed: true })
            .await;

        assert!(blocks.contains(&Block::Warning { text: "Please enter a prompt.".into() }));
        assert!(!blocks.iter().any(|b| matches!(b, Block::Image { .. })));
    }
}

#[tokio::test]
async fn test_image_button_not_pressed_renders_nothing() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant
        .run(&mut session, Event::GenerateImage { prompt: "a cat".into(), pressed: false })
        .await;
    let redraw = assistant.run(&mut session, Event::Redraw).await;

    assert_eq!(blocks, redraw);
}

#[tokio::test]
async fn test_placeholder_image_uses_prompt_as_caption() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let prompt = "A cat riding a bicycle";
    let blocks = assistant
        .run(&mut session, Event::GenerateImage { prompt: prompt.into(), pressed: true })
        .await;

    assert!(blocks.contains(&Block::Image {
        url: PLACEHOLDER_IMAGE_URL.into(),
        caption: prompt.into(),
    }));
}

#[tokio::test]
async fn test_failed_image_generation_renders_error() {
    let assistant = failing_assistant();
    let mut session = Session::new("s1");
    let blocks = assistant
        .run(&mut session, Event::GenerateImage { prompt: "a cat".into(), pressed: true })
        .await;

    assert!(blocks.contains(&Block::Error { text: "Image generation failed: rate limited".into() }));
    assert!(!blocks.iter().any(|b| matches!(b, Block::Image { .. })));
}

#[tokio::test]
async fn test_upload_report_pdf() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let file = UploadedFile::new("report.pdf", Some("application/pdf".into()), 2048);
    let blocks = assistant.run(&mut session, Event::Upload(Some(file))).await;

    let at = blocks
        .iter()
        .position(|b| b == &Block::Markdown { text: "Analyzing `report.pdf`...".into() })
        .expect("status line rendered");
    assert_eq!(blocks[at + 1], Block::Success { text: "File analysis complete!".into() });
    assert_eq!(blocks[at + 2], Block::Caption { text: "report.pdf · 2 KB".into() });
}

#[tokio::test]
async fn test_upload_non_pdf_is_rejected() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let file = UploadedFile::new("notes.txt", Some("text/plain".into()), 10);
    let blocks = assistant.run(&mut session, Event::Upload(Some(file))).await;

    assert!(blocks.contains(&Block::Warning { text: "Only PDF files can be analyzed.".into() }));
    assert!(!blocks.iter().any(|b| matches!(b, Block::Success { .. })));
}

#[tokio::test]
async fn test_upload_without_file_renders_nothing() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant.run(&mut session, Event::Upload(None)).await;
    let redraw = assistant.run(&mut session, Event::Redraw).await;
    assert_eq!(blocks, redraw);
}

#[tokio::test]
async fn test_failed_chat_keeps_dangling_user_turn() {
    let assistant = failing_assistant();
    let mut session = Session::new("s1");
    session.push(Message::user("earlier"));
    session.push(Message::assistant("earlier reply"));

    let blocks = assistant.run(&mut session, Event::ChatSubmit("hello".into())).await;

    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages().last(), Some(&Message::user("hello")));
    assert_eq!(
        blocks.last(),
        Some(&Block::Error { text: "Chat request failed: connection refused".into() })
    );
}

#[tokio::test]
async fn test_history_survives_other_interactions() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    assistant.run(&mut session, Event::ChatSubmit("hi".into())).await;

    let blocks = assistant
        .run(&mut session, Event::GenerateImage { prompt: "a dog".into(), pressed: true })
        .await;
    assert_eq!(
        chat_turns(&blocks),
        vec![
            (MessageRole::User, "hi".to_string()),
            (MessageRole::Assistant, "Echo: hi".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_redraw_is_idempotent() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    assistant.run(&mut session, Event::ChatSubmit("one".into())).await;
    assistant.run(&mut session, Event::ChatSubmit("two".into())).await;

    let first = assistant.run(&mut session, Event::Redraw).await;
    let second = assistant.run(&mut session, Event::Redraw).await;
    assert_eq!(first, second);
    assert_eq!(session.messages().len(), 4);
}

#[tokio::test]
async fn test_page_layout_order() {
    let assistant = Assistant::placeholder();
    let mut session = Session::new("s1");
    let blocks = assistant.run(&mut session, Event::Redraw).await;

    assert_eq!(
        blocks,
        vec![
            Block::Title { text: "Bean AI Assistant".into() },
            Block::Subheader { text: "🖼️ Image Generation".into() },
            Block::Subheader { text: "💬 AI Chat".into() },
        ]
    );
}

#[tokio::test]
async fn test_placeholder_provider_echoes_last_turn() {
    let history = vec![Message::user("first"), Message::assistant("x"), Message::user("second")];
    let reply = PlaceholderProvider.complete(&history).await.unwrap();
    assert_eq!(reply, "Echo: second");
}
