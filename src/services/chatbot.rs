use tracing::debug;

use crate::error::ServiceError;
use crate::services::provider::ChatProvider;
use crate::services::session_manager::{Message, Session};

/// Any non-empty input counts as a chat submission, whitespace included.
pub fn is_submission(input: &str) -> bool {
    !input.is_empty()
}

/// Runs one chat turn against the session history.
///
/// The user turn is appended before the provider is asked. The reply is
/// appended only when the provider succeeds, so a failed call leaves the user
/// turn unanswered in the history.
pub async fn submit_turn(
    session: &mut Session,
    input: &str,
    provider: &dyn ChatProvider,
) -> Result<String, ServiceError> {
    if !is_submission(input) {
        return Err(ServiceError::Validation("Message cannot be empty".into()));
    }

    let len = session.push(Message::user(input));
    debug!(session_id = %session.id, history_len = len, "user turn appended");

    let reply = provider.complete(session.messages()).await?;
    session.push(Message::assistant(reply.clone()));
    Ok(reply)
}
