// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::page::Block;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ImageRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    /// Whether the "Generate Image" button was pressed.
    #[serde(default = "button_pressed")]
    pub generate: bool,
}

fn button_pressed() -> bool {
    true
}

/// The whole page as rendered for one interaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageView {
    pub session_id: String,
    pub blocks: Vec<Block>,
}
