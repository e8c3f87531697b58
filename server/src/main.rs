//! items-server: loads settings from the environment (and `.env`), opens the
//! configured store, and serves the items API until Ctrl-C or SIGTERM.
//!
//! Run from repo root: `cargo run -p items-server`

use items_api::model::sample_items;
use items_api::{app, connect, init_tracing, AppState, ItemStore, SeedOutcome, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    tracing::info!(
        backend = settings.backend.name(),
        presentation = ?settings.presentation,
        update_mode = ?settings.update_mode,
        "starting"
    );

    let store = connect(&settings).await?;
    if settings.seed_on_startup {
        match store.seed_if_empty(sample_items()).await? {
            SeedOutcome::Inserted(n) => tracing::info!(inserted = n, "seeded store"),
            SeedOutcome::AlreadySeeded(n) => tracing::info!(existing = n, "store already seeded"),
        }
    }

    let state = AppState::new(store, &settings);
    let router = app(state, &settings)?;

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
