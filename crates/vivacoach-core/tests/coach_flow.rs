//! End-to-end coach flows against a mock chat-completions server.

use std::sync::Arc;

use vivacoach_core::{CoachConfig, NoopSpeech, PitchCoach, PitchPhase};
use vivacoach_provider::OpenAiCompatOracle;
use vivacoach_schema::{DocumentRef, Role, ScoreCategory};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVALUATION_REPLY: &str = "\
**Overall Score: 72/100**

Pitch Clarity & Structure: 15/20 - Clear arc.
Business Model: 14/20 - Needs pricing detail.
Market Opportunity: 13/20 - Size the market.
Financial Projections: 12/20 - No unit economics.
Communication & Delivery: 18/20 - Strong delivery.";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn oracle_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"content": text}, "finish_reason": "stop"}]
    })
}

fn test_doc() -> DocumentRef {
    DocumentRef::new("deck.pdf", "file:///tmp/deck.pdf", Some("application/pdf".into()))
}

const PITCH: &str = "We are building a marketplace for refurbished lab equipment \
with verified sellers and escrowed payments for universities.";

fn coach_against(server: &MockServer) -> PitchCoach {
    let config = CoachConfig::default();
    let oracle = Arc::new(OpenAiCompatOracle::new("test-key", server.uri()));
    PitchCoach::new(config, oracle, Arc::new(NoopSpeech))
}

#[tokio::test]
async fn upload_pitch_evaluate_shows_parsed_result() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_reply(EVALUATION_REPLY)))
        .expect(1)
        .mount(&server)
        .await;

    let mut coach = coach_against(&server);
    coach.upload_document(test_doc()).unwrap();
    coach.start_pitch().unwrap();
    coach.append_to_transcript(PITCH).unwrap();
    coach.complete_pitch().await.unwrap();

    assert_eq!(coach.session().phase(), PitchPhase::ShowingResult);
    let result = coach.session().evaluation().unwrap();
    assert_eq!(result.overall_score, 72);
    assert_eq!(result.category(ScoreCategory::Clarity), 15);
    assert_eq!(result.category(ScoreCategory::Communication), 18);

    // The raw evaluation text lands in the log as the last assistant entry.
    let last = coach.session().log().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text, EVALUATION_REPLY);
}

#[tokio::test]
async fn short_pitch_is_rejected_without_any_oracle_call() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oracle_reply(EVALUATION_REPLY)))
        .expect(0)
        .mount(&server)
        .await;

    let mut coach = coach_against(&server);
    coach.upload_document(test_doc()).unwrap();
    coach.start_pitch().unwrap();
    coach.append_to_transcript("way too short").unwrap();
    coach.complete_pitch().await.unwrap();

    assert_eq!(coach.session().phase(), PitchPhase::ReadyToPitch);
    assert!(coach.session().evaluation().is_none());
}

#[tokio::test]
async fn oracle_failure_returns_to_ready_and_allows_resubmit() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"type": "api_error", "message": "upstream exploded"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Config-driven wiring, the way production builds the coach.
    let mut config = CoachConfig::default();
    config.oracle.base_url = server.uri();
    config.oracle.api_key = "test-key".into();
    let mut coach = PitchCoach::with_http_oracle(config);

    coach.upload_document(test_doc()).unwrap();
    coach.start_pitch().unwrap();
    coach.append_to_transcript(PITCH).unwrap();
    coach.complete_pitch().await.unwrap();

    // Failed closed: no result, back to ReadyToPitch, no retry happened.
    assert_eq!(coach.session().phase(), PitchPhase::ReadyToPitch);
    assert!(coach.session().evaluation().is_none());

    // The user can immediately pitch again.
    coach.start_pitch().unwrap();
    assert_eq!(coach.session().phase(), PitchPhase::Pitching);
}

#[tokio::test]
async fn advisory_chat_round_trip_with_rolling_context() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "How should I open my pitch?"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(oracle_reply("Lead with the problem.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut coach = coach_against(&server);
    let reply = coach.advise("How should I open my pitch?").await.unwrap();
    assert_eq!(reply, "Lead with the problem.");

    let log = coach.session().log();
    assert_eq!(log.len(), 2);
    assert_eq!(log.entries()[0].role, Role::User);
    assert_eq!(log.entries()[1].text, "Lead with the problem.");
}

#[tokio::test]
async fn advisory_failure_keeps_user_message_and_adds_notice() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"type": "rate_limit_error", "message": "slow down"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut coach = coach_against(&server);
    let err = coach.advise("Am I ready?").await.unwrap_err();
    assert!(err.to_string().contains("rate_limit"));

    let log = coach.session().log();
    assert_eq!(log.len(), 2);
    assert_eq!(log.entries()[0].text, "Am I ready?");
    assert_eq!(log.entries()[1].role, Role::Assistant);
}
