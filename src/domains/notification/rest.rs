use axum::{
  extract::{rejection::JsonRejection, Json, State},
  response::Json as JsonResponse,
  routing::{post, Router},
};
use serde_json::Value;

use super::model::NotificationResponse;
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn notification_routes() -> Router<SharedAppState> {
  Router::new().route("/notification", post(send_notification_handler))
}

pub async fn send_notification_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<JsonResponse<NotificationResponse>, AppError> {
  let Json(payload) = payload?;

  state
    .send_notification(payload)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}
