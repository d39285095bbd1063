use tokio::signal;

use anyhow::Context;

use reservation_notify_api::app::create_app;
use reservation_notify_api::state::SharedAppState;
use reservation_notify_api::utils::{init_email_service, init_tracing, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();

  let config = load_config()?;

  let email_service = init_email_service(&config)?;
  let app_state = SharedAppState::new(&config, email_service);
  let app = create_app(app_state);

  let addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .with_context(|| format!("failed to bind {}", addr))?;

  tracing::info!("Server running on http://{}", addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!(error = %e, "Failed to install Ctrl+C handler");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "Failed to install signal handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
