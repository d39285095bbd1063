use std::sync::Arc;

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use serde::Serialize;
use tower::ServiceExt;

use crate::{
  app::create_app,
  config::{Config, PostmarkConfig},
  domains::notification::recipient::RecipientPolicy,
  email::{DeliveryResult, EmailSender, OutboundEmail},
  state::SharedAppState,
};

mockall::mock! {
    pub EmailSender {}

    #[async_trait]
    impl EmailSender for EmailSender {
        async fn send(&self, email: &OutboundEmail) -> DeliveryResult;
    }
}

pub fn test_config() -> Config {
  Config {
    sender_email: "noreply@example.com".to_string(),
    postmark: PostmarkConfig {
      server_token: "server-token".to_string(),
      account_token: "server-token".to_string(),
      base_url: "http://127.0.0.1:1".to_string(),
      message_stream: "outbound".to_string(),
    },
    recipient_policy: RecipientPolicy::Direct,
    host: "127.0.0.1".to_string(),
    port: 0,
  }
}

pub fn app_with_sender(sender: MockEmailSender) -> Router {
  let state = SharedAppState::new(&test_config(), Arc::new(sender));
  create_app(state)
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let body = serde_json::to_vec(body).expect("serialize request body");
  post_raw(app, uri, "application/json", body).await
}

pub async fn post_raw(
  app: Router,
  uri: &str,
  content_type: &str,
  body: impl Into<Body>,
) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", content_type)
    .body(body.into())
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
  let addr = listener.local_addr().expect("local addr");
  tokio::spawn(async move {
    axum::serve(listener, app).await.expect("serve test app");
  });
  format!("http://{}", addr)
}
