// Handlers for the catalog endpoints

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    catalog::CatalogState,
    error::{AppError, AppResult},
    facets,
    filter::{self, Page},
    models::{CatalogStats, ListedVehicle, SearchParams},
    shortlist::ListKind,
    AppState,
};

// --- Response Wrappers ---

#[derive(Serialize)]
struct CarsResponse<'a> {
    cars: Vec<&'a ListedVehicle>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse<'a> {
    cars: Vec<&'a ListedVehicle>,
    total: usize,
    matched: usize,
    page: usize,
    per_page: usize,
    page_count: usize,
    active_filters: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CarDetailResponse<'a> {
    car: &'a ListedVehicle,
    in_wishlist: bool,
    in_compare: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(flatten)]
    stats: CatalogStats,
    loaded_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogStatusResponse {
    state: &'static str,
    vehicles: Option<usize>,
    loaded_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl From<&CatalogState> for CatalogStatusResponse {
    fn from(state: &CatalogState) -> Self {
        let (vehicles, loaded_at, error) = match state {
            CatalogState::Loading => (None, None, None),
            CatalogState::Ready(catalog) => (Some(catalog.vehicles.len()), Some(catalog.loaded_at), None),
            CatalogState::Failed(message) => (None, None, Some(message.clone())),
        };
        Self { state: state.label(), vehicles, loaded_at, error }
    }
}

// --- API Handlers ---

pub async fn list_cars(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = app_state.ready_catalog().await?;
    tracing::info!("[HANDLER] /api/cars - Returning {} cars", catalog.vehicles.len());
    let body = CarsResponse { cars: catalog.vehicles.iter().collect() };
    Ok(Json(serde_json::to_value(body).context("Failed to serialize cars")?))
}

pub async fn search_cars(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("API call: search_cars with params: {:?}", params);
    let catalog = app_state.ready_catalog().await?;

    let criteria = params.criteria();
    let matched = filter::filter_vehicles(&catalog.vehicles, &criteria);
    let page = Page::new(params.page, params.per_page, app_state.settings.default_page_size);
    let cars = filter::paginate(&matched, page).to_vec();

    tracing::debug!(
        total = catalog.vehicles.len(),
        matched = matched.len(),
        page = page.number,
        "Search complete"
    );

    let body = SearchResponse {
        total: catalog.vehicles.len(),
        matched: matched.len(),
        page: page.number,
        per_page: page.size,
        page_count: page.page_count(matched.len()),
        active_filters: criteria.active_count(),
        cars,
    };
    Ok(Json(serde_json::to_value(body).context("Failed to serialize search results")?))
}

pub async fn get_car(State(app_state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    tracing::info!("[HANDLER] /api/cars/:id - Request received for id: {}", id);
    let catalog = app_state.ready_catalog().await?;
    let car = catalog
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("Car with ID {} not found", id)))?;

    let body = CarDetailResponse {
        car,
        in_wishlist: app_state.shortlists.contains(ListKind::Wishlist, id),
        in_compare: app_state.shortlists.contains(ListKind::Compare, id),
    };
    Ok(Json(serde_json::to_value(body).context("Failed to serialize car")?))
}

pub async fn get_makes(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = app_state.ready_catalog().await?;
    let makes = facets::distinct_makes(&catalog.vehicles);
    tracing::info!("[HANDLER] /api/makes - Returning {} makes", makes.len());
    Ok(Json(makes))
}

pub async fn get_fuel_types(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = app_state.ready_catalog().await?;
    Ok(Json(facets::distinct_fuel_types(&catalog.vehicles)))
}

pub async fn get_stats(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let catalog = app_state.ready_catalog().await?;
    let stats = facets::catalog_stats(&catalog.vehicles, app_state.settings.budget_threshold);
    Ok(Json(StatsResponse { stats, loaded_at: catalog.loaded_at }))
}

pub async fn catalog_status(State(app_state): State<AppState>) -> impl IntoResponse {
    let state = app_state.catalog.read().await;
    Json(CatalogStatusResponse::from(&*state))
}

// Manual retry after a failed load
pub async fn reload_catalog(State(app_state): State<AppState>) -> impl IntoResponse {
    tracing::info!("API call: reload_catalog");
    let state = app_state.reload_catalog().await;
    Json(CatalogStatusResponse::from(&state))
}
