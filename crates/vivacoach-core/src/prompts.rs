//! System instructions and prompt templates for the two oracle calls.

use vivacoach_schema::DocumentRef;

/// Fixed instruction for the scoring call. The template it demands is
/// what `score::parse_evaluation` knows how to read.
pub const SCORING_SYSTEM_PROMPT: &str = "\
You are a strict startup pitch evaluator for an educational platform. \
Score the pitch you are given and reply in exactly this format:

Overall Score: <n>/100

Pitch Clarity & Structure: <n>/20 - <one sentence>
Business Model: <n>/20 - <one sentence>
Market Opportunity: <n>/20 - <one sentence>
Financial Projections: <n>/20 - <one sentence>
Communication & Delivery: <n>/20 - <one sentence>

Close with two short, concrete suggestions for improvement.";

/// Fixed instruction for the advisory chat.
pub const ADVISORY_SYSTEM_PROMPT: &str = "\
You are a supportive startup pitch coach on an educational platform. \
Help the student sharpen their business pitch: answer questions about \
structure, storytelling, business models and delivery. Keep replies \
concise and actionable, two or three sentences unless asked for more.";

/// The user-turn body of the scoring call: the pitch, plus the uploaded
/// document's metadata as context when one is attached.
pub fn evaluation_prompt(pitch: &str, document: Option<&DocumentRef>) -> String {
    match document {
        Some(doc) => format!(
            "The student uploaded a business document named \"{}\". \
             Evaluate their five-minute pitch below.\n\nPitch:\n{pitch}",
            doc.name
        ),
        None => format!("Evaluate the five-minute pitch below.\n\nPitch:\n{pitch}"),
    }
}
