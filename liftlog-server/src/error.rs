use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use liftlog::LiftlogError;
use log::{error, warn};
use serde_json::json;

/// Error half of every handler; owns the kind → status mapping.
#[derive(Debug)]
pub struct ApiError(pub LiftlogError);

impl ApiError {
    pub fn bad_request<D: std::fmt::Display>(d: D) -> Self {
        ApiError(LiftlogError::validation(d))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LiftlogError::Validation(_) => StatusCode::BAD_REQUEST,
            LiftlogError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LiftlogError> for ApiError {
    fn from(e: LiftlogError) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
            "internal storage error".to_string()
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self.0);
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
