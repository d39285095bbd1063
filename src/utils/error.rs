use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

pub const PARTIAL_SUCCESS_MESSAGE: &str = "Reservation confirmed but failed to send notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Rendered as `{"error": message}`.
  Error,
  /// The upstream event is committed; only the follow-up failed.
  /// Rendered as `{"status": "partial_success", "message": message}`.
  PartialSuccess,
}

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
  pub kind: ErrorKind,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
      kind: ErrorKind::Error,
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn partial_success(message: impl Into<String>) -> Self {
    Self {
      status_code: StatusCode::INTERNAL_SERVER_ERROR,
      message: message.into(),
      kind: ErrorKind::PartialSuccess,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = match self.kind {
      ErrorKind::Error => Json(json!({ "error": self.message })),
      ErrorKind::PartialSuccess => Json(json!({
        "status": "partial_success",
        "message": self.message,
      })),
    };

    (self.status_code, body).into_response()
  }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
  fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    AppError::bad_request(rejection.body_text())
  }
}

impl From<crate::domains::notification::service::NotificationServiceError> for AppError {
  fn from(error: crate::domains::notification::service::NotificationServiceError) -> Self {
    use crate::domains::notification::service::NotificationServiceError;
    match error {
      NotificationServiceError::ValidationError(msg) => AppError::bad_request(msg),
      NotificationServiceError::DispatchFailed(_) => AppError::partial_success(PARTIAL_SUCCESS_MESSAGE),
    }
  }
}
