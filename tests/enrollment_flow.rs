//! End-to-end scenarios over the HTTP router backed by the in-memory store.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use college_rs::AppState;
use college_rs::api::routes::create_router;
use college_rs::config::{ConfigLoader, DatabaseBackend, Environment, InitialSubjectPolicy, Settings};

fn app_with(settings: Settings) -> Router {
    create_router(AppState::in_memory(&settings), &settings.cors)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-request-id", "flow-test");
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "flow-test");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        (status, Value::Null)
    } else {
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

async fn create_subject(app: &Router, id: &str, name: &str) {
    let (status, _) = call(
        app,
        Method::POST,
        "/subjects",
        Some(json!({"id": id, "name": name, "year": 1, "credits": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn subject_ids(student: &Value) -> Vec<String> {
    student["subjects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn student_lifecycle_with_enrollments() {
    let app = app_with(Settings::default());
    create_subject(&app, "S1", "Algebra").await;
    create_subject(&app, "S2", "Biology").await;

    let (status, student) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({
            "enrollment": "20230001",
            "name": "Ana",
            "current_year": 2,
            "subjects": [{"id": "S1"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subject_ids(&student), ["S1"]);
    let id = student["id"].as_str().unwrap().to_string();

    let (status, student) = call(&app, Method::POST, &format!("/students/{id}/subjects/S2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subject_ids(&student), ["S1", "S2"]);

    let (status, _) = call(&app, Method::DELETE, &format!("/students/{id}/subjects/S1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, student) = call(
        &app,
        Method::PUT,
        &format!("/students/{id}"),
        Some(json!({"enrollment": "20230001", "name": "Ana Maria", "current_year": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["name"], "Ana Maria");
    assert_eq!(subject_ids(&student), ["S2"]);

    // Deleting the subject drops the enrollment with it
    let (status, _) = call(&app, Method::DELETE, "/subjects/S2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, student) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert!(subject_ids(&student).is_empty());

    let (status, _) = call(&app, Method::DELETE, &format!("/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = call(&app, Method::GET, &format!("/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_enrollment_number_conflicts() {
    let app = app_with(Settings::default());
    let body = json!({"enrollment": "20230001", "name": "Ana", "current_year": 1});

    let (status, _) = call(&app, Method::POST, "/students", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = call(&app, Method::POST, "/students", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["details"]["field"], "enrollment");
}

#[tokio::test]
async fn atomic_policy_rejects_unknown_initial_subject() {
    let mut settings = Settings::default();
    settings.students.initial_subjects = InitialSubjectPolicy::Atomic;
    let app = app_with(settings);
    create_subject(&app, "S1", "Algebra").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/students",
        Some(json!({
            "enrollment": "20230002",
            "name": "Bruno",
            "current_year": 1,
            "subjects": [{"id": "S1"}, {"id": "S404"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, students) = call(&app, Method::GET, "/students", None).await;
    assert_eq!(students, json!([]));
}

#[tokio::test]
async fn teacher_registries_follow_department_prefix() {
    let app = app_with(Settings::default());

    let mut registries = Vec::new();
    for (name, department) in [
        ("Grace", "Computer Science"),
        ("Alan", "Computer Science"),
        ("Emmy", "Mathematics"),
    ] {
        let (status, teacher) = call(
            &app,
            Method::POST,
            "/teachers",
            Some(json!({"name": name, "department": department})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        registries.push(teacher["registry"].as_str().unwrap().to_string());
    }
    assert_eq!(registries, ["COMP-001", "COMP-002", "MATH-001"]);

    let (_, teachers) = call(&app, Method::GET, "/teachers", None).await;
    let id = teachers[0]["id"].as_str().unwrap().to_string();

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/teachers/{id}"),
        Some(json!({"name": "Grace H.", "department": "Physics"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["department"], "Physics");
    assert_eq!(updated["registry"], teachers[0]["registry"]);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = app_with(Settings::default());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/subjects")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn shipped_test_configuration_uses_memory_store() {
    let settings = ConfigLoader::new()
        .unwrap()
        .with_environment(Environment::Test)
        .load()
        .unwrap();

    assert_eq!(settings.database.backend, DatabaseBackend::Memory);
    assert_eq!(settings.registry.max_attempts, 3);
    assert_eq!(settings.students.initial_subjects, InitialSubjectPolicy::BestEffort);
}
