//! Localized coach announcements.
//!
//! Every user-facing status change has a spoken line in both supported
//! locales. Rendering is pure so transitions stay testable; the actual
//! audio dispatch happens in the coach.

use vivacoach_schema::Locale;

/// A status announcement the coach makes.
#[derive(Debug, Clone, PartialEq)]
pub enum CoachPrompt {
    DocumentReceived { name: String },
    NeedDocument,
    PitchStarted { duration_secs: u32 },
    TimeUp,
    PitchTooShort,
    PitchCancelled,
    EvaluationReady { overall_score: u8 },
    EvaluationFailed,
    AdvisoryFailed,
}

pub fn render(prompt: &CoachPrompt, locale: Locale) -> String {
    match locale {
        Locale::English => render_en(prompt),
        Locale::Hindi => render_hi(prompt),
    }
}

fn render_en(prompt: &CoachPrompt) -> String {
    match prompt {
        CoachPrompt::DocumentReceived { name } => {
            format!("I've got {name}. Start your pitch whenever you're ready.")
        }
        CoachPrompt::NeedDocument => {
            "Please upload your business document first, then we can start the pitch.".into()
        }
        CoachPrompt::PitchStarted { duration_secs } => {
            format!(
                "You have {} minutes. Start your pitch now.",
                duration_secs / 60
            )
        }
        CoachPrompt::TimeUp => "Time's up!".into(),
        CoachPrompt::PitchTooShort => {
            "That pitch was too short for me to evaluate. Take a breath and try again.".into()
        }
        CoachPrompt::PitchCancelled => {
            "Pitch cancelled. Start again whenever you're ready.".into()
        }
        CoachPrompt::EvaluationReady { overall_score } => {
            format!("Your pitch scored {overall_score} out of 100. Here's my detailed feedback.")
        }
        CoachPrompt::EvaluationFailed => {
            "I couldn't score your pitch this time. Please submit it again.".into()
        }
        CoachPrompt::AdvisoryFailed => {
            "I couldn't reach your coach right now. Please try again.".into()
        }
    }
}

fn render_hi(prompt: &CoachPrompt) -> String {
    match prompt {
        CoachPrompt::DocumentReceived { name } => {
            format!("मुझे {name} मिल गया। जब तैयार हों, अपनी पिच शुरू करें।")
        }
        CoachPrompt::NeedDocument => {
            "कृपया पहले अपना बिज़नेस दस्तावेज़ अपलोड करें, फिर हम पिच शुरू कर सकते हैं।".into()
        }
        CoachPrompt::PitchStarted { duration_secs } => {
            format!("आपके पास {} मिनट हैं। अपनी पिच अभी शुरू करें।", duration_secs / 60)
        }
        CoachPrompt::TimeUp => "समय समाप्त!".into(),
        CoachPrompt::PitchTooShort => {
            "यह पिच मूल्यांकन के लिए बहुत छोटी थी। फिर से प्रयास करें।".into()
        }
        CoachPrompt::PitchCancelled => "पिच रद्द कर दी गई। जब तैयार हों, फिर से शुरू करें।".into(),
        CoachPrompt::EvaluationReady { overall_score } => {
            format!("आपकी पिच को 100 में से {overall_score} अंक मिले। विस्तृत प्रतिक्रिया यहाँ है।")
        }
        CoachPrompt::EvaluationFailed => {
            "इस बार मैं आपकी पिच का मूल्यांकन नहीं कर पाया। कृपया फिर से भेजें।".into()
        }
        CoachPrompt::AdvisoryFailed => {
            "अभी आपके कोच से संपर्क नहीं हो पाया। कृपया फिर से प्रयास करें।".into()
        }
    }
}
