use std::{env, error::Error, fmt, str::FromStr};

use crate::domains::notification::recipient::RecipientPolicy;

pub const DEFAULT_POSTMARK_API_URL: &str = "https://api.postmarkapp.com";
pub const DEFAULT_MESSAGE_STREAM: &str = "outbound";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5002;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
  Missing(&'static str),
  InvalidSender(String),
  InvalidPort(String),
  InvalidRecipientPolicy(String),
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Missing(key) => write!(f, "{} environment variable must be set", key),
      ConfigError::InvalidSender(value) => write!(f, "EMAIL_ADDRESS is not an email address: {}", value),
      ConfigError::InvalidPort(value) => write!(f, "PORT is not a valid port number: {}", value),
      ConfigError::InvalidRecipientPolicy(value) => {
        write!(f, "RECIPIENT_POLICY must be 'direct' or 'sandbox-self', got: {}", value)
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct PostmarkConfig {
  pub server_token: String,
  pub account_token: String,
  pub base_url: String,
  pub message_stream: String,
}

/// Process-wide settings, read once at startup and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
  pub sender_email: String,
  pub postmark: PostmarkConfig,
  pub recipient_policy: RecipientPolicy,
  pub host: String,
  pub port: u16,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup. Blank values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let sender_email = get("EMAIL_ADDRESS").ok_or(ConfigError::Missing("EMAIL_ADDRESS"))?;
    if !sender_email.contains('@') {
      return Err(ConfigError::InvalidSender(sender_email));
    }

    let server_token = get("POSTMARK_API_TOKEN").ok_or(ConfigError::Missing("POSTMARK_API_TOKEN"))?;
    let account_token = get("POSTMARK_ACCOUNT_TOKEN").unwrap_or_else(|| server_token.clone());

    let recipient_policy = match get("RECIPIENT_POLICY") {
      Some(value) => value.parse()?,
      None => RecipientPolicy::default(),
    };

    let port = match get("PORT") {
      Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort(value))?,
      None => DEFAULT_PORT,
    };

    Ok(Config {
      sender_email,
      postmark: PostmarkConfig {
        server_token,
        account_token,
        base_url: get("POSTMARK_API_URL")
          .map(|url| url.trim_end_matches('/').to_string())
          .unwrap_or_else(|| DEFAULT_POSTMARK_API_URL.to_string()),
        message_stream: get("POSTMARK_MESSAGE_STREAM").unwrap_or_else(|| DEFAULT_MESSAGE_STREAM.to_string()),
      },
      recipient_policy,
      host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
      port,
    })
  }

  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

impl FromStr for RecipientPolicy {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "direct" => Ok(RecipientPolicy::Direct),
      "sandbox-self" | "sandbox_self" => Ok(RecipientPolicy::SandboxSelfDelivery),
      _ => Err(ConfigError::InvalidRecipientPolicy(s.to_string())),
    }
  }
}
