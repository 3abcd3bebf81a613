use crate::{handlers, AppState};
use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the CORS layer: permissive unless a single origin is configured.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{origin}'"))?,
        ),
        None => AllowOrigin::any(),
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/api/health", get(handlers::health))
        // Categories
        .route(
            "/api/photo-categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/photo-categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/api/photo-categories/name/{name}", get(handlers::get_category_by_name))
        // Photos
        .route("/api/photos", get(handlers::list_photos).post(handlers::create_photo))
        .route("/api/photos/search", get(handlers::search_photos))
        .route("/api/photos/popular", get(handlers::list_popular_photos))
        .route("/api/photos/top", get(handlers::list_top_photos))
        .route("/api/photos/featured", get(handlers::list_featured_photos))
        .route("/api/photos/location", get(handlers::list_photos_by_location))
        .route("/api/photos/category/{category_id}", get(handlers::list_photos_by_category))
        .route(
            "/api/photos/category/{category_id}/popular",
            get(handlers::list_popular_photos_by_category),
        )
        .route(
            "/api/photos/{id}",
            get(handlers::get_photo)
                .put(handlers::update_photo)
                .delete(handlers::delete_photo),
        )
        .route("/api/photos/{id}/like", post(handlers::like_photo))
        .route("/api/photos/{id}/unlike", post(handlers::unlike_photo))
        // Middleware Layers
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
