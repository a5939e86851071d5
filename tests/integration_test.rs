//! HTTP-level tests over the full router, run without a model key so every
//! operation exercises the deterministic offline path.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::PUT, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::DELETE, uri, None).await
}

async fn create_session(app: &Router, language: &str) -> String {
    let (status, body) = post(app, "/api/sessions", json!({"nativeLanguage": language})).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_offline_mode() {
    let app = common::create_test_app().await;

    for uri in ["/health", "/api/health"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "offline");
        assert_eq!(body["activeSessions"], 0);
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn create_session_starts_at_beginner() {
    let app = common::create_test_app().await;

    let (status, body) = post(
        &app,
        "/api/sessions",
        json!({"nativeLanguage": "Hindi", "learningStyle": "reading"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let profile = &body["data"]["profile"];
    assert_eq!(profile["nativeLanguage"], "Hindi");
    assert_eq!(profile["difficultyLevel"], "beginner");
    assert_eq!(profile["learningStyle"], "reading");
    assert_eq!(profile["engagementLevel"], "high");
    assert_eq!(profile["topicsCovered"], json!([]));
}

#[tokio::test]
async fn empty_native_language_is_rejected() {
    let app = common::create_test_app().await;

    let (status, body) = post(&app, "/api/sessions", json!({"nativeLanguage": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn full_offline_learning_flow() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Tamil").await;

    // Analyze some material; the offline analysis derives the topic from it.
    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/content/analyze"),
        json!({"content": "Photosynthesis converts light energy into chemical energy inside plant cells"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let main_topic = body["data"]["mainTopic"].as_str().unwrap().to_string();
    assert_eq!(main_topic, "Photosynthesis converts light energy into chemical");

    let (status, body) = get(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hasContent"], true);
    assert_eq!(body["data"]["profile"]["topicsCovered"], json!([main_topic]));

    // The offline quiz is built from the analysis, answers included.
    let (status, body) = post(&app, &format!("/api/sessions/{id}/quiz/generate"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let questions = body["data"].as_array().unwrap().clone();
    assert!(!questions.is_empty());
    let answers: Vec<Value> = questions.iter().map(|q| q["correct"].clone()).collect();

    // A perfect submission promotes the learner and records a strength.
    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/quiz/submit"),
        json!({"answers": answers}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["correctCount"], questions.len() as u64);
    assert_eq!(data["scorePercentage"], 100.0);
    assert_eq!(data["adaptation"]["nextAction"], "move_forward");
    assert_eq!(
        data["adaptation"]["feedback"],
        "Excellent! You have mastered this topic."
    );
    assert_eq!(data["profile"]["difficultyLevel"], "advanced");
    assert_eq!(data["profile"]["strengths"], json!([main_topic]));

    // Analysis and quiz application each left a decision-log entry.
    let (status, body) = get(&app, &format!("/api/sessions/{id}/decisions")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap().clone();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["kind"], "Content Analysis");
    assert_eq!(entries[1]["kind"], "Adaptive Learning");
    assert_eq!(entries[1]["seq"], 2);

    // Next-action decision defaults its score to the last quiz result.
    let (status, body) = post(&app, &format!("/api/sessions/{id}/decision"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["action"], "continue_learning");
    assert_eq!(body["data"]["priority"], "medium");

    let (status, body) = get(&app, &format!("/api/sessions/{id}/decisions?limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "Strategic Planning");
    assert_eq!(entries[0]["seq"], 3);
}

#[tokio::test]
async fn fresh_session_decision_starts_learning() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(&app, &format!("/api/sessions/{id}/decision"), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["action"], "start_learning");
    assert_eq!(body["data"]["priority"], "high");
    assert_eq!(
        body["data"]["suggestedContent"],
        "Start with fundamental concepts"
    );
}

#[tokio::test]
async fn unknown_difficulty_keeps_the_prior_level() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = put(
        &app,
        &format!("/api/sessions/{id}/difficulty"),
        json!({"difficulty": "expert"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = get(&app, &format!("/api/sessions/{id}/profile")).await;
    assert_eq!(body["data"]["difficultyLevel"], "beginner");

    // The legacy vocabulary maps onto the canonical ladder.
    let (status, body) = put(
        &app,
        &format!("/api/sessions/{id}/difficulty"),
        json!({"difficulty": "medium"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["difficultyLevel"], "intermediate");
}

#[tokio::test]
async fn chat_appends_to_history() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Spanish").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/chat"),
        json!({"question": "Why is the sky blue?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["answer"]
        .as_str()
        .unwrap()
        .starts_with("(offline)"));

    let (status, body) = get(&app, &format!("/api/sessions/{id}/chat")).await;
    assert_eq!(status, StatusCode::OK);
    let turns = body["data"].as_array().unwrap().clone();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["question"], "Why is the sky blue?");
}

#[tokio::test]
async fn explain_and_summary_fall_back_to_offline_text() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "French").await;

    post(
        &app,
        &format!("/api/sessions/{id}/content/analyze"),
        json!({"content": "Newton's laws of motion"}),
    )
    .await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/content/explain"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let explanation = body["data"]["explanation"].as_str().unwrap();
    assert!(explanation.starts_with("(offline)"));
    assert!(explanation.contains("French"));

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/content/summary"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["summary"]
        .as_str()
        .unwrap()
        .starts_with("(offline)"));
}

#[tokio::test]
async fn explain_without_content_is_bad_request() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/content/explain"),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn exercises_and_next_topic_work_offline() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/exercises"),
        json!({"topic": "Algebra"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let exercises = body["data"].as_array().unwrap().clone();
    assert_eq!(exercises.len(), 5);
    assert!(exercises[0].as_str().unwrap().contains("Algebra"));

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/topics/next"),
        json!({"currentTopic": "Algebra"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["suggestion"], "Applications of Algebra");

    // The suggestion itself lands in the decision log.
    let (_, body) = get(&app, &format!("/api/sessions/{id}/decisions")).await;
    let entries = body["data"].as_array().unwrap().clone();
    assert_eq!(entries.last().unwrap()["kind"], "Proactive Suggestion");
}

#[tokio::test]
async fn answer_review_grades_locally_offline() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/answer/review"),
        json!({"studentResponse": "  Mitochondria ", "correctAnswer": "mitochondria"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isCorrect"], true);
    assert_eq!(body["data"]["nextAction"], "move_forward");
    assert_eq!(body["data"]["profile"]["difficultyLevel"], "beginner");
}

#[tokio::test]
async fn quiz_submit_without_generate_is_bad_request() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/quiz/submit"),
        json!({"answers": ["a"]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn quiz_generate_without_content_is_bad_request() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/quiz/generate"),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/content/analyze"),
        json!({"content": "   "}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn multimodal_image_requires_the_model() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/multimodal"),
        json!({"imageBase64": "aGVsbG8=", "mimeType": "image/png"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "MODEL_UNAVAILABLE");
}

#[tokio::test]
async fn multimodal_text_runs_the_offline_pipeline() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = post(
        &app,
        &format!("/api/sessions/{id}/multimodal"),
        json!({"text": "The water cycle moves water between oceans and sky"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["explanation"]
        .as_str()
        .unwrap()
        .starts_with("(offline)"));
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = common::create_test_app().await;

    let missing = uuid::Uuid::new_v4();
    let (status, body) = get(&app, &format!("/api/sessions/{missing}/profile")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let app = common::create_test_app().await;
    let id = create_session(&app, "Hindi").await;

    let (status, body) = delete(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_route_is_not_found() {
    let app = common::create_test_app().await;

    let (status, body) = get(&app, "/nonexistent/path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
