use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamaware::{
    api::{create_router, AppState},
    config::{Backend, Config},
    services::{
        auth::{AuthClient, IdentityToolkitAuth, MemoryAuth},
        store::{DocumentStore, FirestoreStore, MemoryStore},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamaware=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let (store, auth) = build_backends(&config)?;
    tracing::info!(store = store.name(), auth = auth.name(), "Backends ready");

    let state = AppState::new(store, auth);
    if config.seed_sample_data {
        match state.catalog.seed_sample_data().await {
            Ok(true) => tracing::info!("Sample catalog written"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Could not seed sample catalog"),
        }
    }

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "StreamAware listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_backends(
    config: &Config,
) -> anyhow::Result<(Arc<dyn DocumentStore>, Arc<dyn AuthClient>)> {
    match config.backend {
        Backend::Memory => Ok((Arc::new(MemoryStore::new()), Arc::new(MemoryAuth::new()))),
        Backend::Firebase => {
            let credentials = config.firebase_credentials()?;
            let store = FirestoreStore::new(
                &config.firestore_url,
                &credentials.project_id,
                credentials.api_key.clone(),
            );
            let auth = IdentityToolkitAuth::new(&config.identity_toolkit_url, credentials.api_key);
            Ok((Arc::new(store), Arc::new(auth)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
