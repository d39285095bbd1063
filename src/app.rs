use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{domains::notification::rest::notification_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/", get(home_handler))
    .nest("/api", notification_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn home_handler() -> Json<Value> {
  Json(json!({
    "status": "online",
    "message": "Restaurant Notification API is running",
    "endpoints": {
      "/api/notification": "POST - Send a notification"
    }
  }))
}
