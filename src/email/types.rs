use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
  pub from: String,
  pub to: String,
  pub subject: String,
  pub html_body: String,
  pub text_body: String,
  pub message_stream: String,
}

impl OutboundEmail {
  pub fn new(
    from: impl Into<String>,
    to: impl Into<String>,
    subject: impl Into<String>,
    html_body: impl Into<String>,
    text_body: impl Into<String>,
  ) -> Self {
    OutboundEmail {
      from: from.into(),
      to: to.into(),
      subject: subject.into(),
      html_body: html_body.into(),
      text_body: text_body.into(),
      message_stream: crate::config::DEFAULT_MESSAGE_STREAM.to_string(),
    }
  }

  pub fn with_message_stream(mut self, message_stream: impl Into<String>) -> Self {
    self.message_stream = message_stream.into();
    self
  }
}

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
  Delivered { message_id: String },
  Rejected { error_code: i64, message: String },
  TransportFailure { cause: String },
}

/// Wire body for `POST /email`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PostmarkEmailRequest<'a> {
  pub from: &'a str,
  pub to: &'a str,
  pub subject: &'a str,
  pub html_body: &'a str,
  pub text_body: &'a str,
  pub message_stream: &'a str,
}

impl<'a> From<&'a OutboundEmail> for PostmarkEmailRequest<'a> {
  fn from(email: &'a OutboundEmail) -> Self {
    PostmarkEmailRequest {
      from: &email.from,
      to: &email.to,
      subject: &email.subject,
      html_body: &email.html_body,
      text_body: &email.text_body,
      message_stream: &email.message_stream,
    }
  }
}

/// Postmark answers both successes and 4xx rejections with this shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PostmarkResponse {
  pub error_code: i64,
  #[serde(default)]
  pub message: String,
  #[serde(rename = "MessageID", default)]
  pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SenderSignature {
  #[serde(rename = "ID")]
  pub id: i64,
  pub email_address: String,
  #[serde(default)]
  pub domain: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SenderSignatureList {
  #[serde(default)]
  pub sender_signatures: Vec<SenderSignature>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateSenderSignatureRequest<'a> {
  pub from_email: &'a str,
  pub name: &'a str,
}
