// Handlers for the wishlist and compare list endpoints

use anyhow::Context;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::ListedVehicle,
    shortlist::{ListKind, ShortlistService, ToggleOutcome},
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShortlistResponse<'a> {
    list: ListKind,
    ids: Vec<i64>,
    // Catalog vehicles for the stored ids; ids no longer in the catalog are skipped
    cars: Vec<&'a ListedVehicle>,
    limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    success: bool,
    #[serde(flatten)]
    outcome: ToggleOutcome,
    ids: Vec<i64>,
}

#[derive(Serialize)]
struct GenericResponse {
    success: bool,
    message: Option<String>,
    ids: Vec<i64>,
}

async fn list(app_state: &AppState, kind: ListKind) -> AppResult<Json<serde_json::Value>> {
    let catalog = app_state.ready_catalog().await?;
    let ids = app_state.shortlists.ids(kind);
    let limit = match kind {
        ListKind::Compare => Some(app_state.shortlists.compare_limit()),
        ListKind::Wishlist => None,
    };
    let body = ShortlistResponse { list: kind, cars: catalog.select(&ids), ids, limit };
    Ok(Json(serde_json::to_value(body).context("Failed to serialize shortlist")?))
}

async fn toggle(app_state: &AppState, kind: ListKind, id: i64) -> AppResult<Json<ToggleResponse>> {
    let catalog = app_state.ready_catalog().await?;
    if catalog.find(id).is_none() {
        return Err(AppError::NotFound(format!("Car with ID {} not found", id)));
    }

    let (outcome, ids) = with_shortlists(app_state, move |shortlists| {
        Ok((shortlists.toggle(kind, id)?, shortlists.ids(kind)))
    })
    .await?;
    tracing::info!(list = kind.key(), id, ?outcome, "Shortlist toggled");
    Ok(Json(ToggleResponse {
        success: !matches!(outcome, ToggleOutcome::Rejected { .. }),
        outcome,
        ids,
    }))
}

// Removal works without a loaded catalog so stale ids can always be dropped
async fn remove(app_state: &AppState, kind: ListKind, id: i64) -> AppResult<Json<GenericResponse>> {
    let (removed, ids) = with_shortlists(app_state, move |shortlists| {
        Ok((shortlists.remove(kind, id)?, shortlists.ids(kind)))
    })
    .await?;
    let message = if removed {
        format!("Car {} removed.", id)
    } else {
        format!("Car {} was not in the list.", id)
    };
    Ok(Json(GenericResponse { success: true, message: Some(message), ids }))
}

async fn clear(app_state: &AppState, kind: ListKind) -> AppResult<Json<GenericResponse>> {
    with_shortlists(app_state, move |shortlists| shortlists.clear(kind)).await?;
    tracing::info!(list = kind.key(), "Shortlist cleared");
    Ok(Json(GenericResponse { success: true, message: None, ids: Vec::new() }))
}

// Mutations may write the store file, so they run on the blocking pool
async fn with_shortlists<T, F>(app_state: &AppState, op: F) -> AppResult<T>
where
    F: FnOnce(&ShortlistService) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let shortlists = Arc::clone(&app_state.shortlists);
    let result = tokio::task::spawn_blocking(move || op(&shortlists))
        .await
        .context("Shortlist task panicked")??;
    Ok(result)
}

// --- Wishlist ---

pub async fn get_wishlist(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    list(&app_state, ListKind::Wishlist).await
}

pub async fn toggle_wishlist(State(app_state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    toggle(&app_state, ListKind::Wishlist, id).await
}

pub async fn remove_from_wishlist(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    remove(&app_state, ListKind::Wishlist, id).await
}

pub async fn clear_wishlist(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    clear(&app_state, ListKind::Wishlist).await
}

// --- Compare ---

pub async fn get_compare(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    list(&app_state, ListKind::Compare).await
}

pub async fn toggle_compare(State(app_state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    toggle(&app_state, ListKind::Compare, id).await
}

pub async fn remove_from_compare(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    remove(&app_state, ListKind::Compare, id).await
}

pub async fn clear_compare(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    clear(&app_state, ListKind::Compare).await
}
