use std::sync::Arc;

use serde_json::Value;

use crate::{
  config::Config,
  domains::notification::{
    model::NotificationResponse,
    service::{DispatchSettings, NotificationService, NotificationServiceError, NotificationServiceImpl},
  },
  email::EmailSender,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_notification(
    &self,
    payload: Value,
  ) -> impl std::future::Future<Output = Result<NotificationResponse, NotificationServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub notification_service: Arc<dyn NotificationService>,
}

impl SharedAppState {
  pub fn new(config: &Config, email_sender: Arc<dyn EmailSender>) -> Self {
    let settings = DispatchSettings {
      sender_email: config.sender_email.clone(),
      message_stream: config.postmark.message_stream.clone(),
      recipient_policy: config.recipient_policy,
    };
    let notification_service = Arc::new(NotificationServiceImpl::new(email_sender, settings));

    Self { notification_service }
  }
}

impl AppState for SharedAppState {
  async fn send_notification(&self, payload: Value) -> Result<NotificationResponse, NotificationServiceError> {
    self.notification_service.send_notification(payload).await
  }
}
