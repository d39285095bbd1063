//! Sender signature maintenance
//!
//! Postmark only accepts mail from verified sender signatures. These calls
//! look up, create and re-verify the signature for the configured sender.
//! Nothing here is on the request-serving path.

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use std::{error::Error, fmt};

use super::types::{CreateSenderSignatureRequest, PostmarkResponse, SenderSignature, SenderSignatureList};
use crate::{config::PostmarkConfig, impl_service_error_conversions};

pub(crate) const ACCOUNT_TOKEN_HEADER: &str = "X-Postmark-Account-Token";
const PAGE_SIZE: u32 = 500;

#[derive(Debug)]
pub enum SignatureError {
  Transport(String),
  Api { error_code: i64, message: String },
  UnexpectedResponse(String),
}

impl Error for SignatureError {}

impl fmt::Display for SignatureError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SignatureError::Transport(msg) => write!(f, "Transport error: {}", msg),
      SignatureError::Api { error_code, message } => write!(f, "Postmark error {}: {}", error_code, message),
      SignatureError::UnexpectedResponse(msg) => write!(f, "Unexpected response: {}", msg),
    }
  }
}

impl_service_error_conversions!(SignatureError, Transport, UnexpectedResponse);

#[async_trait]
pub trait SenderSignatureApi: Send + Sync {
  async fn list(&self) -> Result<Vec<SenderSignature>, SignatureError>;
  async fn create(&self, email: &str, name: &str) -> Result<SenderSignature, SignatureError>;
  async fn resend(&self, id: i64) -> Result<(), SignatureError>;
}

#[derive(Clone)]
pub struct SignatureClient {
  http: reqwest::Client,
  base_url: String,
  account_token: String,
}

impl SignatureClient {
  pub fn new(config: &PostmarkConfig) -> anyhow::Result<Self> {
    Ok(SignatureClient {
      http: reqwest::Client::builder().build()?,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      account_token: config.account_token.clone(),
    })
  }

  fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
    self
      .http
      .request(method, format!("{}{}", self.base_url, path))
      .header(header::ACCEPT, "application/json")
      .header(ACCOUNT_TOKEN_HEADER, &self.account_token)
  }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SignatureError> {
  let status = response.status();
  let body = response.text().await?;

  if !status.is_success() {
    return Err(match serde_json::from_str::<PostmarkResponse>(&body) {
      Ok(err) => SignatureError::Api {
        error_code: err.error_code,
        message: err.message,
      },
      Err(_) => SignatureError::UnexpectedResponse(format!("status {}: {}", status, body)),
    });
  }

  Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl SenderSignatureApi for SignatureClient {
  async fn list(&self) -> Result<Vec<SenderSignature>, SignatureError> {
    let response = self
      .request(reqwest::Method::GET, "/senders")
      .query(&[("count", PAGE_SIZE), ("offset", 0)])
      .send()
      .await?;

    let list: SenderSignatureList = decode(response).await?;
    Ok(list.sender_signatures)
  }

  async fn create(&self, email: &str, name: &str) -> Result<SenderSignature, SignatureError> {
    let response = self
      .request(reqwest::Method::POST, "/senders")
      .json(&CreateSenderSignatureRequest { from_email: email, name })
      .send()
      .await?;

    decode(response).await
  }

  async fn resend(&self, id: i64) -> Result<(), SignatureError> {
    let response = self
      .request(reqwest::Method::POST, &format!("/senders/{}/resend", id))
      .send()
      .await?;

    let ack: PostmarkResponse = decode(response).await?;
    if ack.error_code != 0 {
      return Err(SignatureError::Api {
        error_code: ack.error_code,
        message: ack.message,
      });
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureFlags {
  pub create: bool,
  pub resend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
  Create,
  Resend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
  AlreadyConfirmed { id: i64 },
  VerificationResent { id: i64 },
  Created { id: i64 },
  ConfirmationRequired { action: PendingAction },
}

/// Makes sure `email` has a sender signature. Mutating calls only happen when
/// the matching flag is set; otherwise the caller gets `ConfirmationRequired`.
pub async fn ensure_sender_signature(
  api: &dyn SenderSignatureApi,
  email: &str,
  flags: SignatureFlags,
) -> Result<SignatureOutcome, SignatureError> {
  let signatures = api.list().await?;

  if let Some(existing) = signatures.iter().find(|sig| sig.email_address.eq_ignore_ascii_case(email)) {
    tracing::info!(email, id = existing.id, confirmed = existing.confirmed, "Sender signature already exists");

    if existing.confirmed {
      return Ok(SignatureOutcome::AlreadyConfirmed { id: existing.id });
    }
    if !flags.resend {
      return Ok(SignatureOutcome::ConfirmationRequired {
        action: PendingAction::Resend,
      });
    }

    api.resend(existing.id).await?;
    tracing::info!(email, id = existing.id, "Verification email resent");
    return Ok(SignatureOutcome::VerificationResent { id: existing.id });
  }

  tracing::info!(email, "No existing sender signature found");
  if !flags.create {
    return Ok(SignatureOutcome::ConfirmationRequired {
      action: PendingAction::Create,
    });
  }

  let created = api.create(email, email).await?;
  tracing::info!(email, id = created.id, "Sender signature added, verification email sent");
  Ok(SignatureOutcome::Created { id: created.id })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::spawn_server;
  use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
  };
  use mockall::predicate;
  use serde_json::{json, Value};
  use std::collections::HashMap;

  mockall::mock! {
      SignatureApi {}

      #[async_trait]
      impl SenderSignatureApi for SignatureApi {
          async fn list(&self) -> Result<Vec<SenderSignature>, SignatureError>;
          async fn create(&self, email: &str, name: &str) -> Result<SenderSignature, SignatureError>;
          async fn resend(&self, id: i64) -> Result<(), SignatureError>;
      }
  }

  fn signature(id: i64, email: &str, confirmed: bool) -> SenderSignature {
    SenderSignature {
      id,
      email_address: email.to_string(),
      domain: "example.com".to_string(),
      name: email.to_string(),
      confirmed,
    }
  }

  #[tokio::test]
  async fn test_confirmed_signature_needs_nothing() {
    let mut api = MockSignatureApi::new();
    api
      .expect_list()
      .times(1)
      .returning(|| Ok(vec![signature(7, "noreply@example.com", true)]));
    api.expect_resend().never();
    api.expect_create().never();

    let outcome = ensure_sender_signature(&api, "noreply@example.com", SignatureFlags { create: true, resend: true })
      .await
      .unwrap();
    assert_eq!(outcome, SignatureOutcome::AlreadyConfirmed { id: 7 });
  }

  #[tokio::test]
  async fn test_unconfirmed_signature_without_flag_requires_confirmation() {
    let mut api = MockSignatureApi::new();
    api
      .expect_list()
      .returning(|| Ok(vec![signature(7, "noreply@example.com", false)]));
    api.expect_resend().never();

    let outcome = ensure_sender_signature(&api, "noreply@example.com", SignatureFlags::default())
      .await
      .unwrap();
    assert_eq!(
      outcome,
      SignatureOutcome::ConfirmationRequired {
        action: PendingAction::Resend
      }
    );
  }

  #[tokio::test]
  async fn test_unconfirmed_signature_with_flag_resends() {
    let mut api = MockSignatureApi::new();
    api
      .expect_list()
      .returning(|| Ok(vec![signature(7, "NoReply@Example.com", false)]));
    api
      .expect_resend()
      .with(predicate::eq(7))
      .times(1)
      .returning(|_| Ok(()));

    let outcome = ensure_sender_signature(&api, "noreply@example.com", SignatureFlags { create: false, resend: true })
      .await
      .unwrap();
    assert_eq!(outcome, SignatureOutcome::VerificationResent { id: 7 });
  }

  #[tokio::test]
  async fn test_missing_signature_without_flag_requires_confirmation() {
    let mut api = MockSignatureApi::new();
    api
      .expect_list()
      .returning(|| Ok(vec![signature(1, "other@example.com", true)]));
    api.expect_create().never();

    let outcome = ensure_sender_signature(&api, "noreply@example.com", SignatureFlags::default())
      .await
      .unwrap();
    assert_eq!(
      outcome,
      SignatureOutcome::ConfirmationRequired {
        action: PendingAction::Create
      }
    );
  }

  #[tokio::test]
  async fn test_missing_signature_with_flag_creates() {
    let mut api = MockSignatureApi::new();
    api.expect_list().returning(|| Ok(vec![]));
    api
      .expect_create()
      .with(predicate::eq("noreply@example.com"), predicate::eq("noreply@example.com"))
      .times(1)
      .returning(|email, _| Ok(signature(42, email, false)));

    let outcome = ensure_sender_signature(&api, "noreply@example.com", SignatureFlags { create: true, resend: false })
      .await
      .unwrap();
    assert_eq!(outcome, SignatureOutcome::Created { id: 42 });
  }

  fn client_for(base_url: &str) -> SignatureClient {
    SignatureClient::new(&PostmarkConfig {
      server_token: "server-token".to_string(),
      account_token: "account-token".to_string(),
      base_url: base_url.to_string(),
      message_stream: "outbound".to_string(),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_client_list_and_resend() {
    let app = Router::new()
      .route(
        "/senders",
        get(|headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
          assert_eq!(headers.get(ACCOUNT_TOKEN_HEADER).unwrap(), "account-token");
          assert_eq!(query.get("count").map(String::as_str), Some("500"));
          Json(json!({
            "TotalCount": 1,
            "SenderSignatures": [
              { "ID": 9, "EmailAddress": "noreply@example.com", "Domain": "example.com", "Name": "Noreply", "Confirmed": false }
            ]
          }))
        }),
      )
      .route(
        "/senders/{id}/resend",
        post(|Path(id): Path<i64>| async move {
          assert_eq!(id, 9);
          Json(json!({ "ErrorCode": 0, "Message": "Confirmation email for Sender Signature noreply@example.com was re-sent." }))
        }),
      );
    let base_url = spawn_server(app).await;
    let client = client_for(&base_url);

    let signatures = client.list().await.unwrap();
    assert_eq!(signatures, vec![SenderSignature {
      id: 9,
      email_address: "noreply@example.com".to_string(),
      domain: "example.com".to_string(),
      name: "Noreply".to_string(),
      confirmed: false,
    }]);

    client.resend(9).await.unwrap();
  }

  #[tokio::test]
  async fn test_client_create_surfaces_api_error() {
    let app = Router::new().route(
      "/senders",
      post(|Json(body): Json<Value>| async move {
        assert_eq!(body["FromEmail"], "noreply@example.com");
        (
          StatusCode::UNPROCESSABLE_ENTITY,
          Json(json!({ "ErrorCode": 504, "Message": "This signature already exists." })),
        )
      }),
    );
    let base_url = spawn_server(app).await;

    let err = client_for(&base_url)
      .create("noreply@example.com", "noreply@example.com")
      .await
      .unwrap_err();
    match err {
      SignatureError::Api { error_code, .. } => assert_eq!(error_code, 504),
      other => panic!("Expected Api error, got {:?}", other),
    }
  }
}
