// Route definitions

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

mod api;
mod shortlists;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        // Catalog
        .route("/cars", get(api::list_cars))
        .route("/cars/search", get(api::search_cars))
        .route("/cars/:id", get(api::get_car))
        .route("/makes", get(api::get_makes))
        .route("/fuel-types", get(api::get_fuel_types))
        .route("/stats", get(api::get_stats))
        .route("/catalog", get(api::catalog_status))
        .route("/catalog/reload", post(api::reload_catalog))
        // Wishlist
        .route("/wishlist", get(shortlists::get_wishlist).delete(shortlists::clear_wishlist))
        .route(
            "/wishlist/:id",
            post(shortlists::toggle_wishlist).delete(shortlists::remove_from_wishlist),
        )
        // Compare
        .route("/compare", get(shortlists::get_compare).delete(shortlists::clear_compare))
        .route(
            "/compare/:id",
            post(shortlists::toggle_compare).delete(shortlists::remove_from_compare),
        );

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
