//! Tolerant extraction of scores from the oracle's free-form evaluation.
//!
//! The oracle is asked for a template but is generative text, not a
//! schema: matching is "first integer after the keyword", case
//! insensitive, and a field that fails to parse degrades to 0 on its own
//! instead of failing the evaluation.

use std::collections::BTreeMap;

use regex::Regex;

use vivacoach_schema::{EvaluationResult, ScoreCategory};

const MAX_OVERALL: u32 = 100;
const MAX_CATEGORY: u32 = 20;

fn first_int_after(text: &str, keyword: &str) -> Option<u32> {
    let pattern = format!(r"(?i){}[^\d]*(\d+)", regex::escape(keyword));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

pub fn parse_evaluation(raw_text: &str) -> EvaluationResult {
    let overall_score = match first_int_after(raw_text, "Overall Score:") {
        Some(value) => value.min(MAX_OVERALL) as u8,
        None => {
            tracing::warn!("overall score not found in oracle reply, defaulting to 0");
            0
        }
    };

    let mut category_scores = BTreeMap::new();
    for category in ScoreCategory::ALL {
        let value = match first_int_after(raw_text, category.heading()) {
            Some(value) => value.min(MAX_CATEGORY) as u8,
            None => {
                tracing::warn!(
                    category = category.as_str(),
                    "category score not found in oracle reply, defaulting to 0"
                );
                0
            }
        };
        category_scores.insert(category, value);
    }

    EvaluationResult {
        overall_score,
        category_scores,
        raw_text: raw_text.to_string(),
    }
}
