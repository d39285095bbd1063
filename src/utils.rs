use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{
  config::Config,
  email::{EmailSender, PostmarkClient},
};

pub mod error;

pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Reads `.env` when present, then the process environment. Values in
/// `.env` take precedence over variables already set in the process.
pub fn load_config() -> anyhow::Result<Config> {
  check_dotenv(dotenvy::dotenv_override())?;

  let config = Config::from_env().context("invalid configuration")?;
  tracing::info!(sender = %config.sender_email, policy = ?config.recipient_policy, "Using EMAIL_ADDRESS");
  Ok(config)
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn check_dotenv(result: Result<PathBuf, dotenvy::Error>) -> anyhow::Result<Option<PathBuf>> {
  match result {
    Ok(path) => {
      tracing::info!(path = %path.display(), "Loaded environment variables from .env file");
      Ok(Some(path))
    }
    Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
      tracing::warn!(".env file not found, using process environment only");
      Ok(None)
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to parse .env file");
      Err(e).context("failed to parse .env file")
    }
  }
}

pub fn init_email_service(config: &Config) -> anyhow::Result<Arc<dyn EmailSender>> {
  let client = PostmarkClient::new(&config.postmark).context("failed to build Postmark client")?;
  Ok(Arc::new(client))
}
