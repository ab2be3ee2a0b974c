//! JSON extractor with `validator` checks
//!
//! Malformed bodies are rejected with 400, bodies that parse but break a
//! field rule with 422. Both use the `ApiResponse` error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => format!("{}: {}", field, m),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    // field_errors() is a HashMap
    messages.sort();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct RoomBody {
        #[validate(length(min = 1, max = 100))]
        name: String,
        #[validate(range(min = 1, message = "must be positive"))]
        capacity: i32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<RoomBody>) -> String {
        format!("{}:{}", body.name, body.capacity)
    }

    async fn send(body: &'static str) -> (StatusCode, String) {
        let app = Router::new().route("/rooms", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/rooms")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let (status, body) = send(r#"{"name":"Moscow","capacity":10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Moscow:10");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("\"success\":false"));
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        let (status, body) = send(r#"{"name":"Moscow","capacity":0}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("capacity: must be positive"));
    }
}
