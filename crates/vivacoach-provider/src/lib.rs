pub mod openai_compat;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai_compat::OpenAiCompatOracle;

/// A chat-completion endpoint the coach can talk to. Both the scoring
/// call and the advisory chat go through this seam; they differ only in
/// the system prompt and message window they send.
#[async_trait]
pub trait ChatOracle: Send + Sync {
    async fn complete(&self, request: OracleRequest) -> Result<OracleReply>;
}

/// One message on the wire, chat-completions shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// Request body sent to the oracle. Serializes to exactly the wire shape:
/// `{model, messages, temperature, max_tokens}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The only part of the response we consume: `choices[0].message.content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleReply {
    pub content: String,
}

/// Canned-reply oracle for tests and offline wiring.
pub struct StubOracle {
    reply: Option<String>,
}

impl StubOracle {
    /// Echoes the last user message back, tagged.
    pub fn new() -> Self {
        Self { reply: None }
    }

    /// Always replies with `reply`, whatever was asked.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl Default for StubOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatOracle for StubOracle {
    async fn complete(&self, request: OracleRequest) -> Result<OracleReply> {
        let content = match &self.reply {
            Some(reply) => reply.clone(),
            None => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == "user")
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                format!("[stub:{}] {last_user}", request.model)
            }
        };
        Ok(OracleReply { content })
    }
}
