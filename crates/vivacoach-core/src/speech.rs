//! Speech-output seam.
//!
//! Playback is fire-and-forget: `speak` queues audio and returns, `stop`
//! cuts whatever is playing and is a no-op when nothing is. Failures stay
//! inside the implementation (logged), never in session state.

use vivacoach_schema::Locale;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    pub locale: Locale,
    pub pitch: f32,
    pub rate: f32,
}

impl SpeechParams {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            pitch: 1.0,
            rate: 1.0,
        }
    }
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self::for_locale(Locale::English)
    }
}

pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str, params: &SpeechParams);

    /// Idempotent; safe to call with no active playback.
    fn stop(&self);
}

/// Silent implementation for tests and headless wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeech;

impl SpeechOutput for NoopSpeech {
    fn speak(&self, text: &str, params: &SpeechParams) {
        tracing::debug!(locale = params.locale.bcp47(), "speech suppressed: {text}");
    }

    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_carry_locale() {
        let params = SpeechParams::for_locale(Locale::Hindi);
        assert_eq!(params.locale, Locale::Hindi);
        assert_eq!(params.pitch, 1.0);
        assert_eq!(params.rate, 1.0);
    }

    #[test]
    fn noop_stop_is_idempotent() {
        let speech = NoopSpeech;
        speech.stop();
        speech.stop();
        speech.speak("hello", &SpeechParams::default());
    }
}
