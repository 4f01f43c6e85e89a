use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes.
///
/// The request id is assigned before the trace span is opened so the span can carry it.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route(
            "/titles",
            get(handlers::list_titles).post(handlers::create_title),
        )
        .route("/titles/search", get(handlers::search_titles))
        .route("/titles/filter", post(handlers::filter_titles))
        .route("/titles/top-rated", get(handlers::top_rated))
        .route("/titles/:id", get(handlers::get_title))
        .route(
            "/platforms/:platform/titles",
            get(handlers::titles_by_platform),
        )
        .route(
            "/content-types/:content_type/titles",
            get(handlers::titles_by_content_type),
        )
        .route("/genres/:genre/titles", get(handlers::titles_by_genre))
        // Data manager
        .route("/catalog/stats", get(handlers::catalog_stats))
        .route("/catalog/seed", post(handlers::seed_catalog))
        // Accounts
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/session", get(handlers::current_session))
        .route(
            "/favorites",
            get(handlers::list_favorites).post(handlers::add_favorite),
        )
        .route("/favorites/:id", delete(handlers::remove_favorite))
        .route(
            "/profile",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route("/profile/options", get(handlers::profile_options))
}
