// Car catalog service: normalizes a raw vehicle catalog and serves
// filtered views, facets and wishlist/compare lists over a JSON API.

use anyhow::{Context, Result};
use axum::extract::FromRef;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod catalog;
pub mod config;
pub mod error;
pub mod facets;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod routes;
pub mod shortlist;
pub mod store;

use crate::{
    catalog::{Catalog, CatalogState},
    config::Settings,
    error::{AppError, AppResult},
    shortlist::ShortlistService,
    store::{FileStore, KeyValueStore, MemoryStore},
};

// Shared application state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http_client: Arc<Client>,
    pub catalog: Arc<RwLock<CatalogState>>,
    pub shortlists: Arc<ShortlistService>,
}

impl AppState {
    /// Builds the state with the catalog still `Loading`; call
    /// [`AppState::reload_catalog`] to populate it.
    pub fn new(settings: Settings, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build shared reqwest client")?;
        let shortlists = ShortlistService::new(store, settings.compare_limit);

        Ok(Self {
            settings: Arc::new(settings),
            http_client: Arc::new(http_client),
            catalog: Arc::new(RwLock::new(CatalogState::Loading)),
            shortlists: Arc::new(shortlists),
        })
    }

    /// Picks the store from settings: file-backed when `store_path` is set.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match settings.store_path.as_deref() {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(settings, store)
    }

    /// Loads the catalog from its configured source. On failure the state
    /// stays `Failed` until the next explicit reload.
    pub async fn reload_catalog(&self) -> CatalogState {
        *self.catalog.write().await = CatalogState::Loading;

        let source = self.settings.catalog_source();
        let result = catalog::load_catalog(&source, &self.http_client).await;
        if let Err(e) = &result {
            tracing::error!(source = %source, error = %e, "Catalog load failed");
        }

        let state = CatalogState::from_result(result);
        *self.catalog.write().await = state.clone();
        state
    }

    pub async fn ready_catalog(&self) -> AppResult<Arc<Catalog>> {
        match &*self.catalog.read().await {
            CatalogState::Ready(catalog) => Ok(Arc::clone(catalog)),
            CatalogState::Loading => Err(AppError::Unavailable("Catalog is still loading".to_string())),
            CatalogState::Failed(message) => Err(AppError::Unavailable(message.clone())),
        }
    }
}
