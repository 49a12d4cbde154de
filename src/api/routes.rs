//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, http::HeaderValue, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{health, students, subjects, teachers};
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::CorsConfig;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS and compression
/// 2. Request ID middleware - generates/propagates request IDs
/// 3. Logging middleware - logs requests with request IDs
/// 4. Global error handler - turns plain-text errors into JSON
///
/// # Routes
/// - `/students`, `/subjects`, `/teachers` - resource endpoints
/// - `/health` - health checks
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(students::student_routes())
        .merge(subjects::subject_routes())
        .merge(teachers::teacher_routes())
        .merge(health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let settings = Settings::default();
        create_router(AppState::in_memory(&settings), &settings.cors)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_student_enrollment_flow() {
        let app = app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/subjects",
            Some(json!({"id": "S1", "name": "Algebra", "year": 1, "credits": 6})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, student) = send(
            &app,
            Method::POST,
            "/students",
            Some(json!({"enrollment": "20230001", "name": "Ana", "current_year": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(student["subjects"], json!([]));
        let id = student["id"].as_str().unwrap().to_string();

        let uri = format!("/students/{id}/subjects/S1");
        let (status, enrolled) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(enrolled["subjects"][0]["id"], "S1");

        let (status, error) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["code"], "DUPLICATE_ENTRY");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, fetched) = send(&app, Method::GET, &format!("/students/{id}"), None).await;
        assert_eq!(fetched["subjects"], json!([]));
    }

    #[tokio::test]
    async fn test_teacher_registries() {
        let app = app();

        for (name, expected) in [("Grace", "COMP-001"), ("Alan", "COMP-002")] {
            let (status, teacher) = send(
                &app,
                Method::POST,
                "/teachers",
                Some(json!({"name": name, "department": "Computer Science"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(teacher["registry"], expected);
        }

        let (status, teachers) = send(&app, Method::GET, "/teachers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(teachers.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/teachers",
            Some(json!({"name": "Grace", "department": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, Method::GET, "/subjects/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(
            &app,
            Method::POST,
            "/students",
            Some(json!({"enrollment": "1", "name": "Ana", "current_year": 1, "subjects": [{"id": "nope"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, "/teachers/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "teacher not found for deletion: id=ghost");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json() {
        let (status, body) = send(&app(), Method::GET, "/courses", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_paths() {
        let (status, doc) = send(&app(), Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/students/{student_id}/subjects/{subject_id}"].is_object());
        assert!(doc["paths"]["/teachers"].is_object());
    }
}
