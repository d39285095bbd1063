//! Transactional email delivery
//!
//! Dispatch goes through the [`EmailSender`] trait so handlers never talk to
//! the provider directly. [`PostmarkClient`] is the production implementation;
//! [`signature`] holds the sender-signature maintenance calls used by the
//! `postmark-admin` binary.

mod service;
pub mod signature;
mod types;

use async_trait::async_trait;

pub use service::{send_test_email, PostmarkClient};
pub use types::{DeliveryResult, OutboundEmail, SenderSignature};

#[async_trait]
pub trait EmailSender: Send + Sync {
  /// Makes exactly one delivery attempt. Failures are reported in the result, never retried.
  async fn send(&self, email: &OutboundEmail) -> DeliveryResult;
}
