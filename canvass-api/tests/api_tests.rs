//! Integration tests for the canvass-api HTTP surface
//!
//! Drives the real router over an in-memory database with
//! `tower::ServiceExt::oneshot`.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

use canvass_common::db;
use canvass_common::models::{Answer, SurveyResponse};
use common::*;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_is_public_and_reports_module() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(json_request("GET", "/health", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "canvass-api");
}

// ============================================================================
// Survey CRUD (admin surface)
// ============================================================================

#[tokio::test]
async fn create_survey_requires_bearer_token() {
    let (app, _pool) = test_app().await;
    let payload = json!({"title": "Lunch", "questions": []});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/surveys", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request("POST", "/api/surveys", payload);
    request.headers_mut().insert(
        axum::http::header::AUTHORIZATION,
        "Bearer wrong-token".parse().unwrap(),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_fetch_survey_round_trips() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/api/surveys",
            json!({
                "title": "Team lunch",
                "description": "weekly",
                "questions": [
                    {"text": "Q1", "kind": "text"},
                    {"text": "Q2", "kind": "dropdown", "options": ["a", "b"]},
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Fetch is public (respondents load the form without credentials)
    let response = app
        .oneshot(json_request("GET", &format!("/api/surveys/{}", id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["title"], "Team lunch");
    assert_eq!(fetched["questions"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["questions"][1]["kind"], "dropdown");
}

#[tokio::test]
async fn create_survey_validates_title_and_options() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/api/surveys",
            json!({"title": "  ", "questions": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Choice question with no options
    let response = app
        .oneshot(admin_request(
            "POST",
            "/api/surveys",
            json!({
                "title": "Lunch",
                "questions": [{"text": "Pick one", "kind": "choice", "options": []}],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn list_surveys_omits_questions_and_orders_newest_first() {
    let (app, pool) = test_app().await;
    db::surveys::insert_survey(&pool, "First".to_string(), None, sample_questions())
        .await
        .unwrap();
    db::surveys::insert_survey(&pool, "Second".to_string(), None, vec![])
        .await
        .unwrap();

    let response = app
        .oneshot(admin_request_empty("GET", "/api/surveys"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["title"], "Second");
    assert!(entries[0].get("questions").is_none());
}

#[tokio::test]
async fn malformed_survey_id_is_bad_request() {
    let (app, _pool) = test_app().await;
    let response = app
        .oneshot(json_request("GET", "/api/surveys/not-a-uuid", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_survey_id_is_not_found() {
    let (app, _pool) = test_app().await;
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/surveys/{}", Uuid::new_v4()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_survey_replaces_schema() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Old".to_string(), None, sample_questions())
        .await
        .unwrap();

    let response = app
        .oneshot(admin_request(
            "PUT",
            &format!("/api/surveys/{}", survey.id),
            json!({
                "title": "New",
                "questions": [{"text": "Only question", "kind": "rating"}],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["questions"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Response submission (public surface)
// ============================================================================

fn submission(survey_id: &str, phone: &str) -> serde_json::Value {
    json!({
        "surveyId": survey_id,
        "name": "Kim",
        "phone": phone,
        "answers": [{"questionText": "Q1", "value": "fine"}],
    })
}

#[tokio::test]
async fn valid_submission_is_created() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Lunch".to_string(), None, sample_questions())
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/responses",
            submission(&survey.id.to_string(), "010-1234-5678"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["surveyId"], survey.id.to_string());
    assert!(body["responseId"].as_str().is_some());

    assert_eq!(
        db::responses::count_for_survey(&pool, survey.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn unknown_survey_yields_not_found_and_persists_nothing() {
    let (app, pool) = test_app().await;
    let ghost_id = Uuid::new_v4();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/responses",
            submission(&ghost_id.to_string(), "010-1234-5678"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        db::responses::count_for_survey(&pool, ghost_id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn duplicate_phone_for_same_survey_conflicts() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Lunch".to_string(), None, sample_questions())
        .await
        .unwrap();
    let id = survey.id.to_string();

    let first = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/responses",
            submission(&id, "010-1234-5678"),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request(
            "POST",
            "/api/responses",
            submission(&id, "010-1234-5678"),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(error_code(&body), "CONFLICT");

    assert_eq!(
        db::responses::count_for_survey(&pool, survey.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn validation_failures_are_unprocessable() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Lunch".to_string(), None, sample_questions())
        .await
        .unwrap();
    let id = survey.id.to_string();

    for payload in [
        json!({"surveyId": id, "name": "", "phone": "010-1234-5678", "answers": []}),
        json!({"surveyId": id, "name": "Kim", "phone": "not-a-phone", "answers": []}),
        json!({"surveyId": id, "name": "Kim", "phone": "010-1234-5678",
               "answers": [{"questionText": "Q1", "value": "  "}]}),
        json!({"surveyId": "garbage", "name": "Kim", "phone": "010-1234-5678", "answers": []}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/responses", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    assert_eq!(
        db::responses::count_for_survey(&pool, survey.id).await.unwrap(),
        0
    );
}

// ============================================================================
// Cascade delete
// ============================================================================

#[tokio::test]
async fn deleting_survey_removes_all_its_responses() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Doomed".to_string(), None, sample_questions())
        .await
        .unwrap();

    for i in 0..3 {
        db::responses::insert_response(
            &pool,
            &SurveyResponse {
                id: Uuid::new_v4(),
                survey_id: survey.id,
                name: format!("user{}", i),
                phone: format!("010-0000-000{}", i),
                answers: vec![Answer {
                    question_text: "Q1".to_string(),
                    value: "x".to_string(),
                }],
                submitted_at: Utc::now(),
            },
        )
        .await
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(admin_request_empty(
            "DELETE",
            &format!("/api/surveys/{}", survey.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["responsesRemoved"], 3);

    // Survey and responses are both gone
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/surveys/{}", survey.id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        db::responses::count_for_survey(&pool, survey.id).await.unwrap(),
        0
    );

    // Export against the deleted identity is NotFound too
    let response = app
        .oneshot(admin_request_empty(
            "POST",
            &format!("/api/surveys/{}/export", survey.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_survey_is_not_found() {
    let (app, _pool) = test_app().await;
    let response = app
        .oneshot(admin_request_empty(
            "DELETE",
            &format!("/api/surveys/{}", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Export error surface (success path lives in delivery_tests)
// ============================================================================

#[tokio::test]
async fn export_with_zero_responses_is_empty_report() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Quiet".to_string(), None, sample_questions())
        .await
        .unwrap();

    let response = app
        .oneshot(admin_request_empty(
            "POST",
            &format!("/api/surveys/{}/export", survey.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(error_code(&body), "EMPTY_REPORT");
}

#[tokio::test]
async fn export_without_channel_is_configuration_error() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Lunch".to_string(), None, sample_questions())
        .await
        .unwrap();
    db::responses::insert_response(
        &pool,
        &SurveyResponse {
            id: Uuid::new_v4(),
            survey_id: survey.id,
            name: "Kim".to_string(),
            phone: "010-1234-5678".to_string(),
            answers: vec![],
            submitted_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    let response = app
        .oneshot(admin_request_empty(
            "POST",
            &format!("/api/surveys/{}/export", survey.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(error_code(&body), "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn export_requires_bearer_token() {
    let (app, pool) = test_app().await;
    let survey = db::surveys::insert_survey(&pool, "Lunch".to_string(), None, vec![])
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{}/export", survey.id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
