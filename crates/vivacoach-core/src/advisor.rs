//! Advisory chat context assembly.
//!
//! The advisory path has no state machine: the user message is appended
//! to the log, the last few entries are replayed as context, and the
//! reply is appended back. This module builds that request.

use vivacoach_provider::{OracleRequest, WireMessage};
use vivacoach_schema::ConversationLog;

use crate::config::OracleConfig;
use crate::prompts::ADVISORY_SYSTEM_PROMPT;

/// Rolling context window sent to the advisory oracle.
pub const DEFAULT_CONTEXT_MESSAGES: usize = 10;

/// Replay the last `window` log entries (the newest of which is the
/// message being answered) behind the advisory system prompt.
pub fn build_advisory_request(
    oracle: &OracleConfig,
    log: &ConversationLog,
    window: usize,
) -> OracleRequest {
    let mut messages = vec![WireMessage::system(ADVISORY_SYSTEM_PROMPT)];
    for entry in log.recent(window) {
        messages.push(WireMessage {
            role: entry.role.as_str().to_string(),
            content: entry.text.clone(),
        });
    }

    OracleRequest {
        model: oracle.model.clone(),
        messages,
        temperature: oracle.temperature,
        max_tokens: oracle.max_tokens,
    }
}
