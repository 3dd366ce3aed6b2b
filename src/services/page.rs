//! Renders the page for one interaction.
//!
//! Every interaction re-runs the whole page top to bottom: title, upload
//! output, image output, then the complete chat history. [`Assistant::run`]
//! is the only place that mutates a session, and it does so through the
//! `&mut Session` it is handed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ServiceError;
use crate::services::chatbot::{is_submission, submit_turn};
use crate::services::file_analysis::{UploadedFile, analyze_file, check_file_type};
use crate::services::image_generator::generate_image;
use crate::services::provider::{ChatProvider, ImageProvider, PlaceholderProvider};
use crate::services::session_manager::{MessageRole, Session};

pub const PAGE_TITLE: &str = "Bean AI Assistant";
pub const IMAGE_SECTION: &str = "🖼️ Image Generation";
pub const CHAT_SECTION: &str = "💬 AI Chat";
pub const ANALYSIS_COMPLETE: &str = "File analysis complete!";

/// One rendered page element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Title { text: String },
    Subheader { text: String },
    Markdown { text: String },
    Success { text: String },
    Warning { text: String },
    Error { text: String },
    Caption { text: String },
    Image { url: String, caption: String },
    ChatTurn { role: MessageRole, content: String },
}

impl Block {
    pub fn is_failure(&self) -> bool {
        matches!(self, Block::Warning { .. } | Block::Error { .. })
    }

    /// Validation failures become warnings; external failures become errors
    /// prefixed with what was being attempted.
    pub fn from_failure(context: &str, err: &ServiceError) -> Block {
        match err {
            ServiceError::Validation(msg) => Block::Warning { text: msg.clone() },
            ServiceError::ExternalService(msg) => Block::Error { text: format!("{context}: {msg}") },
        }
    }
}

/// A single user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Upload(Option<UploadedFile>),
    GenerateImage { prompt: String, pressed: bool },
    ChatSubmit(String),
    Redraw,
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Upload(_) => "upload",
            Event::GenerateImage { .. } => "image",
            Event::ChatSubmit(_) => "chat",
            Event::Redraw => "redraw",
        }
    }
}

#[derive(Clone)]
pub struct Assistant {
    chat: Arc<dyn ChatProvider>,
    images: Arc<dyn ImageProvider>,
}

impl Assistant {
    pub fn new(chat: Arc<dyn ChatProvider>, images: Arc<dyn ImageProvider>) -> Self {
        Self { chat, images }
    }

    pub fn placeholder() -> Self {
        Self::new(Arc::new(PlaceholderProvider), Arc::new(PlaceholderProvider))
    }

    pub async fn run(&self, session: &mut Session, event: Event) -> Vec<Block> {
        let mut blocks = vec![Block::Title { text: PAGE_TITLE.to_string() }];

        if let Event::Upload(Some(file)) = &event {
            render_upload(file, &mut blocks);
        }

        blocks.push(Block::Subheader { text: IMAGE_SECTION.to_string() });
        if let Event::GenerateImage { prompt, pressed: true } = &event {
            match generate_image(prompt, self.images.as_ref()).await {
                Ok(image) => blocks.push(Block::Image { url: image.url, caption: image.caption }),
                Err(err) => {
                    if let ServiceError::ExternalService(msg) = &err {
                        warn!(session_id = %session.id, error = %msg, "image generation failed");
                    }
                    blocks.push(Block::from_failure("Image generation failed", &err));
                }
            }
        }

        blocks.push(Block::Subheader { text: CHAT_SECTION.to_string() });
        let chat_error = match &event {
            Event::ChatSubmit(input) if is_submission(input) => {
                match submit_turn(session, input, self.chat.as_ref()).await {
                    Ok(_) => None,
                    Err(err) => {
                        warn!(session_id = %session.id, error = %err, "chat request failed");
                        Some(Block::from_failure("Chat request failed", &err))
                    }
                }
            }
            _ => None,
        };

        blocks.extend(render_history(session));
        blocks.extend(chat_error);
        blocks
    }
}

fn render_upload(file: &UploadedFile, blocks: &mut Vec<Block>) {
    if let Err(err) = check_file_type(file) {
        blocks.push(Block::from_failure("Error analyzing file", &err));
        return;
    }

    blocks.push(Block::Markdown { text: format!("Analyzing `{}`...", file.name) });
    match analyze_file(file) {
        Ok(report) => {
            blocks.push(Block::Success { text: ANALYSIS_COMPLETE.to_string() });
            blocks.push(Block::Caption { text: format!("{} · {}", report.file_name, report.size) });
        }
        Err(err) => blocks.push(Block::from_failure("Error analyzing file", &err)),
    }
}

/// Redraws the history in insertion order without touching it.
pub fn render_history(session: &Session) -> impl Iterator<Item = Block> + '_ {
    session.messages().iter().map(|m| Block::ChatTurn { role: m.role, content: m.content.clone() })
}
