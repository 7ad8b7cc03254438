use anyhow::{Context, Result};
use car_catalog::{config::Settings, routes, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Logs every wishlist/compare change published by the shortlist service
fn spawn_shortlist_logger(app_state: &AppState) {
    let mut events = app_state.shortlists.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(list = ?event.list, ids = ?event.ids, "Shortlist changed"),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Shortlist logger lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "car_catalog=info,tower_http=info".into())) // Default to info if RUST_LOG not set
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing car catalog server...");

    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = settings
        .server_address
        .parse()
        .with_context(|| format!("Invalid server address format: {}", settings.server_address))?;

    let app_state = AppState::from_settings(settings).context("Failed to build application state")?;
    spawn_shortlist_logger(&app_state);

    // Load in the background; requests get 503 until the catalog is ready
    let loader_state = app_state.clone();
    tokio::spawn(async move {
        loader_state.reload_catalog().await;
    });

    let app = routes::create_router(app_state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
