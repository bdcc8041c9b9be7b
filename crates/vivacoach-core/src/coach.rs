//! The controller that wires the session to its collaborators.
//!
//! `PitchCoach` owns the session value plus the oracle and speech seams,
//! runs every transition, and dispatches the effects the session returns.
//! All mutation funnels through `&mut self` on one task, so at most one
//! scoring call and one advisory call can ever be in flight.

use std::sync::Arc;

use anyhow::Result;
use tokio::time::{interval, Duration};

use vivacoach_provider::{ChatOracle, OpenAiCompatOracle, OracleRequest, WireMessage};
use vivacoach_schema::DocumentRef;

use crate::advisor::build_advisory_request;
use crate::config::CoachConfig;
use crate::document::{self, DocumentPicker};
use crate::messages::{render, CoachPrompt};
use crate::prompts::{evaluation_prompt, SCORING_SYSTEM_PROMPT};
use crate::session::{PitchPhase, PitchSession, SessionEffect};
use crate::speech::{NoopSpeech, SpeechOutput, SpeechParams};

pub struct PitchCoach {
    session: PitchSession,
    oracle: Arc<dyn ChatOracle>,
    speech: Arc<dyn SpeechOutput>,
    config: CoachConfig,
}

impl PitchCoach {
    pub fn new(config: CoachConfig, oracle: Arc<dyn ChatOracle>, speech: Arc<dyn SpeechOutput>) -> Self {
        let session = PitchSession::with_settings(
            config.locale,
            config.pitch.duration_secs,
            config.pitch.min_transcript_chars,
        );
        Self {
            session,
            oracle,
            speech,
            config,
        }
    }

    /// Production wiring: HTTP oracle from the config, no speech backend.
    pub fn with_http_oracle(config: CoachConfig) -> Self {
        let oracle = Arc::new(OpenAiCompatOracle::new(
            config.oracle.api_key.clone(),
            config.oracle.base_url.clone(),
        ));
        Self::new(config, oracle, Arc::new(NoopSpeech))
    }

    pub fn session(&self) -> &PitchSession {
        &self.session
    }

    /// Validate and attach an uploaded document.
    pub fn upload_document(&mut self, doc: DocumentRef) -> Result<()> {
        document::validate(&doc)?;
        let effects = self.session.upload_document(doc)?;
        self.play(&effects);
        Ok(())
    }

    /// Run the external picker; `Ok(false)` means the user cancelled.
    pub fn pick_and_upload(&mut self, picker: &dyn DocumentPicker) -> Result<bool> {
        match picker.pick()? {
            Some(doc) => {
                self.upload_document(doc)?;
                Ok(true)
            }
            None => {
                tracing::debug!("document picker cancelled");
                Ok(false)
            }
        }
    }

    pub fn start_pitch(&mut self) -> Result<()> {
        let effects = self.session.start_pitch()?;
        self.play(&effects);
        Ok(())
    }

    pub fn append_to_transcript(&mut self, text: &str) -> Result<()> {
        self.session.append_to_transcript(text)?;
        Ok(())
    }

    pub fn cancel_pitch(&mut self) -> Result<()> {
        let effects = self.session.cancel_pitch()?;
        self.play(&effects);
        Ok(())
    }

    /// One countdown second. May complete the pitch and therefore call the
    /// scoring oracle.
    pub async fn tick(&mut self) -> Result<()> {
        let effects = self.session.tick()?;
        self.dispatch(effects).await
    }

    /// Explicit submit before the timer runs out.
    pub async fn complete_pitch(&mut self) -> Result<()> {
        let effects = self.session.complete_pitch()?;
        self.dispatch(effects).await
    }

    /// Drive the countdown at one tick per second until the pitch ends
    /// (timer expiry, cancellation or explicit submit from another event).
    pub async fn run_countdown(&mut self) -> Result<()> {
        let mut clock = interval(Duration::from_secs(1));
        clock.tick().await; // first tick fires immediately
        while self.session.phase() == PitchPhase::Pitching {
            clock.tick().await;
            if self.session.phase() != PitchPhase::Pitching {
                break;
            }
            self.tick().await?;
        }
        Ok(())
    }

    /// Advisory chat: append the user message, replay the rolling context
    /// window, append and speak the reply. On oracle failure the session
    /// keeps the user message, gets a localized failure notice, and the
    /// error propagates for the caller to surface.
    pub async fn advise(&mut self, text: &str) -> Result<String> {
        self.session.record_user_message(text)?;

        let request = build_advisory_request(
            &self.config.oracle,
            self.session.log(),
            self.config.advisory.context_messages,
        );

        match self.oracle.complete(request).await {
            Ok(reply) => {
                self.session.record_assistant_message(reply.content.clone());
                self.speak(&reply.content);
                Ok(reply.content)
            }
            Err(err) => {
                tracing::warn!("advisory call failed: {err:#}");
                let notice = render(&CoachPrompt::AdvisoryFailed, self.session.locale());
                self.session.record_assistant_message(notice.clone());
                self.speak(&notice);
                Err(err)
            }
        }
    }

    async fn dispatch(&mut self, effects: Vec<SessionEffect>) -> Result<()> {
        self.play(&effects);
        if let Some((pitch, document)) = take_submission(effects) {
            self.evaluate(pitch, document).await?;
        }
        Ok(())
    }

    /// Send the finalized pitch to the scoring oracle and feed the outcome
    /// back into the session. Oracle failure is recoverable: the session
    /// returns to ReadyToPitch and this method still returns Ok.
    async fn evaluate(&mut self, pitch: String, document: Option<DocumentRef>) -> Result<()> {
        tracing::info!(chars = pitch.chars().count(), "submitting pitch for evaluation");
        let request = OracleRequest {
            model: self.config.oracle.model.clone(),
            messages: vec![
                WireMessage::system(SCORING_SYSTEM_PROMPT),
                WireMessage::user(evaluation_prompt(&pitch, document.as_ref())),
            ],
            temperature: self.config.oracle.temperature,
            max_tokens: self.config.oracle.max_tokens,
        };

        match self.oracle.complete(request).await {
            Ok(reply) => {
                let effects = self.session.receive_evaluation(&reply.content)?;
                self.play(&effects);
            }
            Err(err) => {
                tracing::warn!("scoring call failed: {err:#}");
                let effects = self.session.evaluation_failed()?;
                self.play(&effects);
            }
        }
        Ok(())
    }

    fn play(&self, effects: &[SessionEffect]) {
        for effect in effects {
            match effect {
                SessionEffect::Speak(text) => self.speak(text),
                SessionEffect::StopSpeech => self.speech.stop(),
                SessionEffect::Submit { .. } => {}
            }
        }
    }

    fn speak(&self, text: &str) {
        self.speech
            .speak(text, &SpeechParams::for_locale(self.config.locale));
    }
}

fn take_submission(effects: Vec<SessionEffect>) -> Option<(String, Option<DocumentRef>)> {
    effects.into_iter().find_map(|effect| match effect {
        SessionEffect::Submit { pitch, document } => Some((pitch, document)),
        _ => None,
    })
}
