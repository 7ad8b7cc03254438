//! Loading the raw catalog from its data source and holding the result.
//!
//! This is the one asynchronous boundary of the service. Everything
//! downstream of [`load_catalog`] works on the in-memory [`Catalog`].

use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    error::CatalogError,
    models::{ListedVehicle, RawVehicleRecord},
    normalizer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "file {}", path.display()),
            CatalogSource::Url(url) => write!(f, "url {}", url),
        }
    }
}

/// The normalized catalog. Read-only once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub vehicles: Vec<ListedVehicle>,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn from_raw(raw: &[RawVehicleRecord]) -> Self {
        Self {
            vehicles: normalizer::with_display_keys(normalizer::normalize(raw)),
            loaded_at: Utc::now(),
        }
    }

    // Ids can collide; the first record with the id wins
    pub fn find(&self, id: i64) -> Option<&ListedVehicle> {
        self.vehicles.iter().find(|v| v.vehicle.id == id)
    }

    /// Vehicles whose id is in `ids`, in catalog order.
    pub fn select(&self, ids: &[i64]) -> Vec<&ListedVehicle> {
        self.vehicles.iter().filter(|v| ids.contains(&v.vehicle.id)).collect()
    }
}

/// Extracts the records from a `{"cars": [...]}` document.
pub fn parse_document(document: Value) -> Result<Vec<RawVehicleRecord>, CatalogError> {
    match document {
        Value::Object(mut map) => match map.remove("cars") {
            Some(Value::Array(cars)) => Ok(cars.into_iter().map(RawVehicleRecord::from_value).collect()),
            _ => Err(CatalogError::InvalidShape("cars array not found".to_string())),
        },
        _ => Err(CatalogError::InvalidShape("expected a JSON object".to_string())),
    }
}

pub async fn load_catalog(source: &CatalogSource, http_client: &Client) -> Result<Catalog, CatalogError> {
    tracing::info!(source = %source, "Loading catalog");

    let bytes = match source {
        CatalogSource::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
            .map_err(CatalogError::Unreachable)?,
        CatalogSource::Url(url) => fetch_remote(http_client, url).await.map_err(CatalogError::Unreachable)?,
    };
    tracing::debug!(bytes = bytes.len(), "Catalog source read");

    let document: Value = serde_json::from_slice(&bytes)
        .map_err(|e| CatalogError::InvalidShape(format!("not valid JSON ({})", e)))?;
    let raw = parse_document(document)?;
    let catalog = Catalog::from_raw(&raw);

    tracing::info!(vehicles = catalog.vehicles.len(), "Catalog loaded");
    Ok(catalog)
}

async fn fetch_remote(client: &Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()
        .context("Catalog source returned an error status")?;
    let bytes = response.bytes().await.context("Failed to read catalog response body")?;
    Ok(bytes.to_vec())
}

/// Loading lifecycle: `Loading` precedes both `Ready` and `Failed`, which
/// are mutually exclusive.
#[derive(Debug, Clone)]
pub enum CatalogState {
    Loading,
    Ready(Arc<Catalog>),
    Failed(String),
}

impl CatalogState {
    pub fn from_result(result: Result<Catalog, CatalogError>) -> Self {
        match result {
            Ok(catalog) => CatalogState::Ready(Arc::new(catalog)),
            Err(e) => CatalogState::Failed(e.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogState::Loading => "loading",
            CatalogState::Ready(_) => "ready",
            CatalogState::Failed(_) => "error",
        }
    }
}
