//! The pitch-session state machine.
//!
//! Transitions are pure: they mutate the session value and return the
//! side effects (speech, oracle submission) for the caller to dispatch.
//! No I/O happens here, which keeps every transition testable without
//! timers or network.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vivacoach_schema::{ConversationEntry, ConversationLog, DocumentRef, EvaluationResult, Locale};

use crate::messages::{render, CoachPrompt};
use crate::score;

/// Workflow stage of the pitch session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PitchPhase {
    Idle,
    AwaitingDocument,
    ReadyToPitch,
    Pitching,
    Evaluating,
    ShowingResult,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{op} is not allowed while {phase:?}")]
    InvalidPhase { op: &'static str, phase: PitchPhase },
}

/// Side effect a transition asks its caller to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Speak the given (already localized) announcement.
    Speak(String),
    /// Cut any in-progress speech playback.
    StopSpeech,
    /// Send the finalized pitch to the scoring oracle.
    Submit {
        pitch: String,
        document: Option<DocumentRef>,
    },
}

pub const DEFAULT_PITCH_DURATION_SECS: u32 = 300;
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

/// One user's pitch workflow: phase, countdown, transcript, document,
/// conversation log and the last evaluation. Created once per screen
/// activation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchSession {
    phase: PitchPhase,
    remaining_seconds: u32,
    transcript: String,
    document: Option<DocumentRef>,
    log: ConversationLog,
    evaluation: Option<EvaluationResult>,
    locale: Locale,
    pitch_duration_secs: u32,
    min_transcript_chars: usize,
}

impl PitchSession {
    pub fn new(locale: Locale) -> Self {
        Self::with_settings(locale, DEFAULT_PITCH_DURATION_SECS, MIN_TRANSCRIPT_CHARS)
    }

    pub fn with_settings(locale: Locale, pitch_duration_secs: u32, min_transcript_chars: usize) -> Self {
        Self {
            phase: PitchPhase::Idle,
            remaining_seconds: 0,
            transcript: String::new(),
            document: None,
            log: ConversationLog::new(),
            evaluation: None,
            locale,
            pitch_duration_secs,
            min_transcript_chars,
        }
    }

    pub fn phase(&self) -> PitchPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn evaluation(&self) -> Option<&EvaluationResult> {
        self.evaluation.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Store the uploaded document and move to ReadyToPitch. Allowed from
    /// every phase except mid-pitch and mid-evaluation.
    pub fn upload_document(&mut self, doc: DocumentRef) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_not_busy("upload_document")?;

        let text = render(&CoachPrompt::DocumentReceived { name: doc.name.clone() }, self.locale);
        tracing::info!(document = %doc.name, "document attached to session");
        self.document = Some(doc);
        self.phase = PitchPhase::ReadyToPitch;
        self.say(&text);
        Ok(vec![SessionEffect::Speak(text)])
    }

    /// Begin the timed pitch. Without a document this parks the session in
    /// AwaitingDocument and prompts for one instead of failing.
    pub fn start_pitch(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_not_busy("start_pitch")?;

        if self.document.is_none() {
            self.phase = PitchPhase::AwaitingDocument;
            let text = render(&CoachPrompt::NeedDocument, self.locale);
            self.say(&text);
            return Ok(vec![SessionEffect::Speak(text)]);
        }

        self.remaining_seconds = self.pitch_duration_secs;
        self.transcript.clear();
        self.evaluation = None;
        self.phase = PitchPhase::Pitching;
        tracing::info!(duration_secs = self.pitch_duration_secs, "pitch started");

        let text = render(
            &CoachPrompt::PitchStarted { duration_secs: self.pitch_duration_secs },
            self.locale,
        );
        self.say(&text);
        Ok(vec![SessionEffect::Speak(text)])
    }

    /// One second of wall clock elapsed. At zero the pitch completes
    /// synchronously, so the returned effects may include `Submit`.
    pub fn tick(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_phase(PitchPhase::Pitching, "tick")?;

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Ok(vec![]);
        }

        tracing::info!("pitch timer expired");
        let mut effects = vec![SessionEffect::Speak(render(&CoachPrompt::TimeUp, self.locale))];
        effects.extend(self.complete_pitch()?);
        Ok(effects)
    }

    /// Space-joins `text` onto the running transcript.
    pub fn append_to_transcript(&mut self, text: &str) -> Result<(), SessionError> {
        self.guard_phase(PitchPhase::Pitching, "append_to_transcript")?;

        if !self.transcript.is_empty() {
            self.transcript.push(' ');
        }
        self.transcript.push_str(text);
        Ok(())
    }

    /// Abandon the current attempt. No scoring call is made.
    pub fn cancel_pitch(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_phase(PitchPhase::Pitching, "cancel_pitch")?;

        self.transcript.clear();
        self.phase = PitchPhase::ReadyToPitch;
        let text = render(&CoachPrompt::PitchCancelled, self.locale);
        self.say(&text);
        Ok(vec![SessionEffect::StopSpeech, SessionEffect::Speak(text)])
    }

    /// Finalize the pitch. Transcripts under the minimum length bounce
    /// back to ReadyToPitch with an explanation; everything else freezes
    /// the transcript and enters Evaluating.
    pub fn complete_pitch(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_phase(PitchPhase::Pitching, "complete_pitch")?;

        let pitch = self.transcript.trim().to_string();
        if pitch.chars().count() < self.min_transcript_chars {
            tracing::info!(chars = pitch.chars().count(), "pitch too short to evaluate");
            self.phase = PitchPhase::ReadyToPitch;
            let text = render(&CoachPrompt::PitchTooShort, self.locale);
            self.say(&text);
            return Ok(vec![SessionEffect::Speak(text)]);
        }

        self.log.push(ConversationEntry::user(pitch.clone()));
        self.transcript.clear();
        self.phase = PitchPhase::Evaluating;
        Ok(vec![SessionEffect::Submit {
            pitch,
            document: self.document.clone(),
        }])
    }

    /// The scoring oracle answered. Parses the reply, stores the result and
    /// shows it. A reply arriving after the session left Evaluating (reset,
    /// re-activation) is rejected here and therefore discarded by callers.
    pub fn receive_evaluation(&mut self, raw_text: &str) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_phase(PitchPhase::Evaluating, "receive_evaluation")?;

        let result = score::parse_evaluation(raw_text);
        let overall = result.overall_score;
        tracing::info!(overall_score = overall, "evaluation received");

        self.evaluation = Some(result);
        self.phase = PitchPhase::ShowingResult;
        self.log.push(ConversationEntry::assistant(raw_text));

        let text = render(&CoachPrompt::EvaluationReady { overall_score: overall }, self.locale);
        Ok(vec![SessionEffect::Speak(text)])
    }

    /// The scoring call failed. Back to ReadyToPitch; the previous
    /// evaluation (if any) is left untouched.
    pub fn evaluation_failed(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.guard_phase(PitchPhase::Evaluating, "evaluation_failed")?;

        self.phase = PitchPhase::ReadyToPitch;
        let text = render(&CoachPrompt::EvaluationFailed, self.locale);
        self.say(&text);
        Ok(vec![SessionEffect::Speak(text)])
    }

    /// Append a free-text user message (advisory chat). Rejected while the
    /// pitch timer runs: everything typed then belongs to the transcript.
    pub fn record_user_message(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.phase == PitchPhase::Pitching {
            return Err(SessionError::InvalidPhase {
                op: "record_user_message",
                phase: self.phase,
            });
        }
        self.log.push(ConversationEntry::user(text));
        Ok(())
    }

    pub fn record_assistant_message(&mut self, text: impl Into<String>) {
        self.log.push(ConversationEntry::assistant(text));
    }

    fn say(&mut self, text: &str) {
        self.log.push(ConversationEntry::assistant(text));
    }

    fn guard_not_busy(&self, op: &'static str) -> Result<(), SessionError> {
        match self.phase {
            PitchPhase::Pitching | PitchPhase::Evaluating => {
                Err(SessionError::InvalidPhase { op, phase: self.phase })
            }
            _ => Ok(()),
        }
    }

    fn guard_phase(&self, expected: PitchPhase, op: &'static str) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidPhase { op, phase: self.phase });
        }
        Ok(())
    }
}
