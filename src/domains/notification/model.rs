use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

pub const REQUIRED_FIELDS: [&str; 5] = [
  "user_name",
  "restaurant_name",
  "reservation_time",
  "table_number",
  "user_email",
];

/// Field values are kept as display text for rendering; `raw` holds the
/// five values exactly as received so they can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NotificationRequest {
  pub user_name: String,
  pub restaurant_name: String,
  pub reservation_time: String,
  pub table_number: String,
  pub user_email: String,
  // Only set when `user_email` arrived as a JSON string.
  #[validate(contains(pattern = "@", message = "user_email must contain '@'"))]
  email_text: Option<String>,
  raw: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
  NotAnObject,
  MissingField(&'static str),
  InvalidField(&'static str),
}

impl std::fmt::Display for PayloadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PayloadError::NotAnObject => write!(f, "Request body must be a JSON object"),
      PayloadError::MissingField(field) => write!(f, "Missing required field: {}", field),
      PayloadError::InvalidField(field) => write!(f, "Invalid value for field: {}", field),
    }
  }
}

impl NotificationRequest {
  /// Presence is checked for every field, in [`REQUIRED_FIELDS`] order,
  /// before any value is type-checked. `null` counts as absent. Any other
  /// scalar is accepted; arrays and objects are not.
  pub fn from_payload(payload: &Value) -> Result<Self, PayloadError> {
    let object = payload.as_object().ok_or(PayloadError::NotAnObject)?;

    if let Some(field) = REQUIRED_FIELDS
      .iter()
      .find(|field| matches!(object.get(**field), None | Some(Value::Null)))
    {
      return Err(PayloadError::MissingField(*field));
    }

    let text = |field: &'static str| -> Result<String, PayloadError> {
      object
        .get(field)
        .and_then(display_text)
        .ok_or(PayloadError::InvalidField(field))
    };

    let raw = REQUIRED_FIELDS
      .iter()
      .filter_map(|field| object.get(*field).map(|value| (field.to_string(), value.clone())))
      .collect();

    Ok(NotificationRequest {
      user_name: text("user_name")?,
      restaurant_name: text("restaurant_name")?,
      reservation_time: text("reservation_time")?,
      table_number: text("table_number")?,
      user_email: text("user_email")?,
      email_text: object.get("user_email").and_then(Value::as_str).map(str::to_string),
      raw,
    })
  }
}

fn display_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
  pub status: String,
  pub message: String,
  pub notification: Map<String, Value>,
}

impl NotificationResponse {
  pub fn sent(request: NotificationRequest) -> Self {
    NotificationResponse {
      status: "success".to_string(),
      message: "Notification sent successfully".to_string(),
      notification: request.raw,
    }
  }
}
