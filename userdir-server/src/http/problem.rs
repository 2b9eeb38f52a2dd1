use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// RFC 7807 compliant error response body used throughout the API.
///
/// `code` is the stable machine-readable discriminator
/// (`validation_failed`, `not_found`, `conflict`, `internal_error`);
/// `message` is the human-readable explanation. Validation failures carry a
/// `details.errors` map of field name to message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            problem_type: format!("https://userdir.dev/problems/{code}"),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, axum::Json(self)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        // Error bodies are never cacheable.
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn problem_type_embeds_the_code() {
        let problem = ProblemDetails::new(StatusCode::CONFLICT, "conflict", "duplicate email");
        assert_eq!(problem.problem_type, "https://userdir.dev/problems/conflict");
        assert_eq!(problem.title, "Conflict");
        assert_eq!(problem.status, 409);
    }

    #[tokio::test]
    async fn into_response_uses_the_problem_status() {
        for (status, code) in [
            (StatusCode::BAD_REQUEST, "validation_failed"),
            (StatusCode::NOT_FOUND, "not_found"),
            (StatusCode::CONFLICT, "conflict"),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        ] {
            let response = ProblemDetails::new(status, code, "boom").into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[tokio::test]
    async fn into_response_sets_problem_json_content_type() {
        let response = ProblemDetails::new(StatusCode::NOT_FOUND, "not_found", "missing")
            .with_details(json!({ "id": 7 }))
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");
    }
}
