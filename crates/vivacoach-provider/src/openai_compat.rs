//! OpenAI-compatible chat-completions client.
//!
//! The scoring and advisory endpoints both speak this shape; only the
//! prompts differ. Calls fail closed: non-success statuses and transport
//! errors surface as errors, never as silent retries.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{ChatOracle, OracleReply, OracleRequest};

#[derive(Debug, Clone)]
pub struct OpenAiCompatOracle {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleErrorKind {
    RateLimit,
    ServerError,
    Timeout,
    AuthError,
    InvalidRequest,
    Unknown,
}

impl OracleErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::RateLimit,
            401 | 403 => Self::AuthError,
            400 | 422 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::AuthError => "auth_error",
            Self::InvalidRequest => "invalid_request",
            Self::Unknown => "unknown",
        }
    }
}

impl OpenAiCompatOracle {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatOracle for OpenAiCompatOracle {
    async fn complete(&self, request: OracleRequest) -> Result<OracleReply> {
        let url = format!("{}/chat/completions", self.api_base);
        tracing::debug!(model = %request.model, messages = request.messages.len(), "calling oracle");

        let req = self
            .client
            .post(url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request);

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return Err(anyhow!(
                    "oracle api error (timeout): request timed out after 60s"
                ));
            }
            Err(e) if e.is_connect() => {
                return Err(anyhow!("oracle api error (connect): {e}"));
            }
            Err(e) => return Err(e.into()),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await?;
            let parsed = serde_json::from_str::<ApiError>(&text).ok();
            return Err(format_api_error(status, parsed));
        }

        let body: ApiResponse = resp.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("oracle returned no choices"))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| anyhow!("oracle returned an empty message"))?;

        Ok(OracleReply { content })
    }
}

fn format_api_error(status: StatusCode, parsed: Option<ApiError>) -> anyhow::Error {
    let kind = OracleErrorKind::from_status(status);
    if let Some(api_error) = parsed {
        let detail = api_error.error;
        anyhow!(
            "oracle api error ({status}, {}): {} ({})",
            kind.as_str(),
            detail.message,
            detail.r#type
        )
    } else {
        anyhow!("oracle api error ({status}, {})", kind.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse {
    pub choices: Vec<ApiChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiChoice {
    pub message: ApiMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub r#type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let oracle = OpenAiCompatOracle::new("sk-test", "https://api.example.com/v1/");
        assert_eq!(oracle.api_base, "https://api.example.com/v1");
        assert_eq!(oracle.api_key, "sk-test");
    }

    #[test]
    fn api_response_deserialization_works() {
        let raw = serde_json::json!({
            "choices": [{
                "message": {"content": "Overall Score: 72/100"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        });
        let parsed: ApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Overall Score: 72/100")
        );
    }

    #[test]
    fn api_response_null_content_is_none() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": null}}]
        });
        let parsed: ApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, None);
    }

    #[test]
    fn api_error_deserialization_works() {
        let raw = serde_json::json!({
            "error": {
                "type": "invalid_request_error",
                "message": "messages: field required"
            }
        });
        let parsed: ApiError = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.error.r#type, "invalid_request_error");
        assert_eq!(parsed.error.message, "messages: field required");
    }

    #[test]
    fn error_kind_classification() {
        assert_eq!(
            OracleErrorKind::from_status(StatusCode::TOO_MANY_REQUESTS),
            OracleErrorKind::RateLimit
        );
        assert_eq!(
            OracleErrorKind::from_status(StatusCode::UNAUTHORIZED),
            OracleErrorKind::AuthError
        );
        assert_eq!(
            OracleErrorKind::from_status(StatusCode::BAD_REQUEST),
            OracleErrorKind::InvalidRequest
        );
        assert_eq!(
            OracleErrorKind::from_status(StatusCode::BAD_GATEWAY),
            OracleErrorKind::ServerError
        );
        assert_eq!(
            OracleErrorKind::from_status(StatusCode::IM_A_TEAPOT),
            OracleErrorKind::Unknown
        );
    }

    #[test]
    fn format_api_error_with_parsed_body() {
        let parsed = Some(ApiError {
            error: ApiErrorDetail {
                r#type: "rate_limit_error".into(),
                message: "too many requests".into(),
            },
        });
        let err = format_api_error(StatusCode::TOO_MANY_REQUESTS, parsed);
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate_limit"));
        assert!(text.contains("too many requests"));
    }

    #[test]
    fn format_api_error_without_parsed_body() {
        let err = format_api_error(StatusCode::INTERNAL_SERVER_ERROR, None);
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("server_error"));
    }
}
