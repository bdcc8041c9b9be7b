use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the coach conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Append-only, insertion-ordered message log. Drives the transcript
/// display and is replayed (bounded) as advisory chat context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// MIME types the document picker is allowed to hand us.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// Metadata for an uploaded business document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl DocumentRef {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            mime_type,
        }
    }

    /// A document with an unknown MIME type is rejected.
    pub fn is_accepted(&self) -> bool {
        self.mime_type.as_deref().is_some_and(is_accepted_mime)
    }
}

/// The five dimensions the scoring oracle grades, each out of 20.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Clarity,
    BusinessModel,
    Market,
    Financial,
    Communication,
}

impl ScoreCategory {
    pub const ALL: [Self; 5] = [
        Self::Clarity,
        Self::BusinessModel,
        Self::Market,
        Self::Financial,
        Self::Communication,
    ];

    /// The heading prefix the oracle uses for this category. Matching is
    /// prefix-based because the oracle pads headings freely
    /// ("Pitch Clarity & Structure", "Financial Projections", ...).
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Clarity => "Pitch Clarity",
            Self::BusinessModel => "Business Model",
            Self::Market => "Market Opportunity",
            Self::Financial => "Financial",
            Self::Communication => "Communication",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::BusinessModel => "business_model",
            Self::Market => "market",
            Self::Financial => "financial",
            Self::Communication => "communication",
        }
    }
}

/// Structured outcome of one scored pitch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationResult {
    /// 0..=100
    pub overall_score: u8,
    /// Per-category 0..=20; a missing key reads as 0.
    pub category_scores: BTreeMap<ScoreCategory, u8>,
    /// The oracle's verbatim evaluation text.
    pub raw_text: String,
}

impl EvaluationResult {
    pub fn category(&self, category: ScoreCategory) -> u8 {
        self.category_scores.get(&category).copied().unwrap_or(0)
    }
}

/// Speech locales the coach can announce in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Hindi,
}

impl Locale {
    pub fn bcp47(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Hindi => "hi-IN",
        }
    }
}
