use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, StatusCode};

use super::{
  types::{DeliveryResult, OutboundEmail, PostmarkEmailRequest, PostmarkResponse},
  EmailSender,
};
use crate::config::PostmarkConfig;

pub(crate) const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Clone)]
pub struct PostmarkClient {
  http: reqwest::Client,
  base_url: String,
  server_token: String,
}

impl PostmarkClient {
  pub fn new(config: &PostmarkConfig) -> Result<Self> {
    let http = reqwest::Client::builder().build()?;

    Ok(PostmarkClient {
      http,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      server_token: config.server_token.clone(),
    })
  }

  fn email_url(&self) -> String {
    format!("{}/email", self.base_url)
  }
}

#[async_trait]
impl EmailSender for PostmarkClient {
  async fn send(&self, email: &OutboundEmail) -> DeliveryResult {
    tracing::info!(to = %email.to, subject = %email.subject, "Sending email via Postmark");

    let response = self
      .http
      .post(self.email_url())
      .header(header::ACCEPT, "application/json")
      .header(SERVER_TOKEN_HEADER, &self.server_token)
      .json(&PostmarkEmailRequest::from(email))
      .send()
      .await;

    let response = match response {
      Ok(response) => response,
      Err(e) => {
        tracing::error!(error = %e, "Error sending email via Postmark");
        return DeliveryResult::TransportFailure { cause: e.to_string() };
      }
    };

    let status = response.status();
    let body = match response.text().await {
      Ok(body) => body,
      Err(e) => {
        tracing::error!(error = %e, %status, "Failed to read Postmark response body");
        return DeliveryResult::TransportFailure { cause: e.to_string() };
      }
    };

    let result = interpret_response(status, &body);
    match &result {
      DeliveryResult::Delivered { message_id } => {
        tracing::info!(message_id = %message_id, "Email sent successfully via Postmark");
      }
      DeliveryResult::Rejected { error_code, message } => {
        tracing::warn!(error_code, message = %message, "Postmark returned error");
      }
      DeliveryResult::TransportFailure { cause } => {
        tracing::error!(cause = %cause, "Unexpected response from Postmark");
      }
    }
    result
  }
}

pub(crate) fn interpret_response(status: StatusCode, body: &str) -> DeliveryResult {
  match serde_json::from_str::<PostmarkResponse>(body) {
    Ok(response) if response.error_code != 0 => DeliveryResult::Rejected {
      error_code: response.error_code,
      message: response.message,
    },
    Ok(response) if status.is_success() => DeliveryResult::Delivered {
      message_id: response.message_id.unwrap_or_default(),
    },
    Ok(_) => DeliveryResult::TransportFailure {
      cause: format!("Postmark responded with status {}", status),
    },
    Err(_) => DeliveryResult::TransportFailure {
      cause: format!("Postmark responded with status {}: {}", status, body),
    },
  }
}

/// Sends a fixed message from the configured sender back to itself.
pub async fn send_test_email(sender: &dyn EmailSender, from: &str, message_stream: &str) -> DeliveryResult {
  let email = OutboundEmail::new(
    from,
    from,
    "Test Email from Postmark",
    "<html><body><h1>Test Email</h1><p>This is a test email sent using Postmark.</p></body></html>",
    "This is a test email sent using Postmark.",
  )
  .with_message_stream(message_stream);

  sender.send(&email).await
}
