//! Operational commands for the Postmark account behind the notification API.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use reservation_notify_api::{
  email::{
    send_test_email,
    signature::{ensure_sender_signature, PendingAction, SignatureClient, SignatureFlags, SignatureOutcome},
    DeliveryResult, PostmarkClient,
  },
  utils::{init_tracing, load_config},
};

#[derive(Debug, Parser)]
#[command(name = "postmark-admin", about = "Maintain the Postmark sender used for notifications")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Check the sender signature for EMAIL_ADDRESS, optionally creating it or resending verification.
  Signature {
    /// Create the signature if it does not exist yet.
    #[arg(long)]
    create: bool,
    /// Resend the verification email if the signature is unconfirmed.
    #[arg(long)]
    resend: bool,
  },
  /// Send a test email from EMAIL_ADDRESS to itself.
  SendTest,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  init_tracing();
  let cli = Cli::parse();
  let config = load_config()?;

  match cli.command {
    Command::Signature { create, resend } => {
      let client = SignatureClient::new(&config.postmark)?;
      let outcome = ensure_sender_signature(&client, &config.sender_email, SignatureFlags { create, resend }).await?;

      match outcome {
        SignatureOutcome::AlreadyConfirmed { id } => {
          println!("Sender signature {} for {} is confirmed.", id, config.sender_email);
        }
        SignatureOutcome::VerificationResent { id } => {
          println!("Verification email for signature {} resent to {}.", id, config.sender_email);
        }
        SignatureOutcome::Created { id } => {
          println!("Sender signature {} added. Check {} for the verification link.", id, config.sender_email);
        }
        SignatureOutcome::ConfirmationRequired { action: PendingAction::Resend } => {
          println!(
            "{} is not confirmed yet. Re-run with --resend to send a new verification email.",
            config.sender_email
          );
          return Ok(ExitCode::from(2));
        }
        SignatureOutcome::ConfirmationRequired { action: PendingAction::Create } => {
          println!(
            "No sender signature found for {}. Re-run with --create to add it.",
            config.sender_email
          );
          return Ok(ExitCode::from(2));
        }
      }
    }
    Command::SendTest => {
      let client = PostmarkClient::new(&config.postmark)?;
      match send_test_email(&client, &config.sender_email, &config.postmark.message_stream).await {
        DeliveryResult::Delivered { message_id } => println!("Test email sent, message id {}.", message_id),
        DeliveryResult::Rejected { error_code, message } => {
          eprintln!("Postmark rejected the test email ({}): {}", error_code, message);
          return Ok(ExitCode::FAILURE);
        }
        DeliveryResult::TransportFailure { cause } => {
          eprintln!("Could not reach Postmark: {}", cause);
          return Ok(ExitCode::FAILURE);
        }
      }
    }
  }

  Ok(ExitCode::SUCCESS)
}
