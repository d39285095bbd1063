use async_trait::async_trait;
use serde_json::Value;
use std::{error::Error, sync::Arc};
use validator::Validate;

use super::{
  model::{NotificationRequest, NotificationResponse},
  recipient::RecipientPolicy,
  template::render_confirmation,
};
use crate::email::{DeliveryResult, EmailSender, OutboundEmail};

#[derive(Debug)]
pub enum NotificationServiceError {
  ValidationError(String),
  DispatchFailed(String),
}

impl Error for NotificationServiceError {}

impl std::fmt::Display for NotificationServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NotificationServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
      NotificationServiceError::DispatchFailed(msg) => write!(f, "Dispatch Failed: {}", msg),
    }
  }
}

#[async_trait]
pub trait NotificationService: Send + Sync {
  async fn send_notification(&self, payload: Value) -> Result<NotificationResponse, NotificationServiceError>;
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
  pub sender_email: String,
  pub message_stream: String,
  pub recipient_policy: RecipientPolicy,
}

pub struct NotificationServiceImpl {
  email_sender: Arc<dyn EmailSender>,
  settings: DispatchSettings,
}

impl NotificationServiceImpl {
  pub fn new(email_sender: Arc<dyn EmailSender>, settings: DispatchSettings) -> Self {
    Self { email_sender, settings }
  }

  fn compose(&self, req: &NotificationRequest) -> OutboundEmail {
    let rendered = render_confirmation(req);
    let to = self
      .settings
      .recipient_policy
      .resolve(&self.settings.sender_email, &req.user_email);

    OutboundEmail::new(
      &self.settings.sender_email,
      to,
      rendered.subject,
      rendered.html_body,
      rendered.text_body,
    )
    .with_message_stream(&self.settings.message_stream)
  }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
  async fn send_notification(&self, payload: Value) -> Result<NotificationResponse, NotificationServiceError> {
    let req = NotificationRequest::from_payload(&payload)
      .map_err(|e| NotificationServiceError::ValidationError(e.to_string()))?;

    req.validate().map_err(|e| {
      let message = e
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| format!("Validation failed: {}", e));
      NotificationServiceError::ValidationError(message)
    })?;

    let email = self.compose(&req);
    tracing::info!(to = %email.to, restaurant = %req.restaurant_name, "Dispatching reservation confirmation");

    match self.email_sender.send(&email).await {
      DeliveryResult::Delivered { message_id } => {
        tracing::info!(message_id = %message_id, "Reservation confirmation delivered");
        Ok(NotificationResponse::sent(req))
      }
      DeliveryResult::Rejected { error_code, message } => {
        tracing::warn!(error_code, message = %message, "Provider rejected reservation confirmation");
        Err(NotificationServiceError::DispatchFailed(format!(
          "provider error {}: {}",
          error_code, message
        )))
      }
      DeliveryResult::TransportFailure { cause } => {
        tracing::error!(cause = %cause, "Failed to reach email provider");
        Err(NotificationServiceError::DispatchFailed(cause))
      }
    }
  }
}
