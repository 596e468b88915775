use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::error::EngagementError;
use serde_json::json;
use thiserror::Error;

/// Handler-level error: every service failure funnels through here and comes
/// out as a status code plus a small JSON body. Raw driver errors never reach
/// the wire.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engagement(#[from] EngagementError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Engagement(e) => {
                let status = match e {
                    EngagementError::Unauthorized => StatusCode::UNAUTHORIZED,
                    EngagementError::Validation(_) => StatusCode::BAD_REQUEST,
                    EngagementError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
                    EngagementError::NotFound(_) => StatusCode::NOT_FOUND,
                    EngagementError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.code(), e.to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_errors_map_to_expected_statuses() {
        let cases = [
            (EngagementError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                EngagementError::validation("empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                EngagementError::invalid("self-follow"),
                StatusCode::BAD_REQUEST,
            ),
            (EngagementError::NotFound("content"), StatusCode::NOT_FOUND),
            (
                EngagementError::Persistence("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn anyhow_failures_become_500_with_json_body() {
        let err: ApiError = anyhow::anyhow!("connection dropped").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
