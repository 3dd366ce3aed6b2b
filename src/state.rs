// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{Config, ProviderMode};
use crate::message::PageView;
use crate::services::metrics_manager::MetricsManager;
use crate::services::openai::OpenAiClient;
use crate::services::page::{Assistant, Event};
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
    pub assistant: Assistant,
    pub admin_key: Option<String>,
}

impl AppState {
    /// Placeholder backends, no admin access.
    pub fn new(session_ttl: Duration) -> Self {
        Self::with_assistant(session_ttl, Assistant::placeholder())
    }

    pub fn with_assistant(session_ttl: Duration, assistant: Assistant) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl),
            metrics: MetricsManager::new(),
            assistant,
            admin_key: None,
        }
    }

    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let assistant = match config.mode {
            ProviderMode::Live => {
                let client = Arc::new(
                    OpenAiClient::new(config.api_key.clone())
                        .with_base_url(config.api_base_url.clone())
                        .with_model(config.chat_model.clone())
                        .with_max_tokens(config.chat_max_tokens),
                );
                info!(model = client.model(), key_present = config.api_key.is_some(), "using OpenAI backend");
                Assistant::new(client.clone(), client)
            }
            ProviderMode::Placeholder => {
                info!("using placeholder backend");
                Assistant::placeholder()
            }
        };

        Self {
            admin_key: config.admin_key.clone(),
            ..Self::with_assistant(config.session_ttl, assistant)
        }
    }

    /// Runs one interaction for the caller's session and returns the page.
    ///
    /// The session stays locked for the whole run, so interactions on the
    /// same session are handled one at a time.
    pub async fn interact(&self, session_id: Option<&str>, event: Event) -> PageView {
        let (session_id, handle) = self.sessions.checkout(session_id).await;
        let kind = event.kind();

        let blocks = {
            let mut session = handle.lock().await;
            self.assistant.run(&mut session, event).await
        };

        let failed = blocks.iter().any(|b| b.is_failure());
        self.metrics.record(kind, failed).await;

        PageView { session_id, blocks }
    }
}
