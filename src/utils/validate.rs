//! JSON extractor that runs `validator` rules before the handler sees the body.

use axum::extract::{FromRequest, Json, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(max = 8, message = "Name must be at most 8 characters"))]
        name: String,
        #[serde(default)]
        year: i32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let result =
            ValidatedJson::<TestBody>::from_request(json_request(r#"{"name":"Ana"}"#), &()).await;

        let ValidatedJson(body) = result.unwrap();
        assert_eq!(body.name, "Ana");
        assert_eq!(body.year, 0);
    }

    #[tokio::test]
    async fn test_rule_violation() {
        let result = ValidatedJson::<TestBody>::from_request(
            json_request(r#"{"name":"Ana Beatriz Souza"}"#),
            &(),
        )
        .await;

        match result {
            Err(AppError::ValidationErrors { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
                assert!(errors[0].message.contains("at most 8"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let result =
            ValidatedJson::<TestBody>::from_request(json_request(r#"{"name":"#), &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::from(r#"{"name":"Ana"}"#))
            .unwrap();

        let result = ValidatedJson::<TestBody>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }
}
