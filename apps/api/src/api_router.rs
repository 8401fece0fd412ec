use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};


pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/audit-results",
            get(handlers::results::list_audit_results_handler),
        )
        .route(
            "/audit-results/",
            get(handlers::results::list_audit_results_handler),
        )
        .route(
            "/audit-results/clear",
            delete(handlers::results::clear_audit_results_handler),
        )
        .route("/audit/stats", get(handlers::results::audit_stats_handler))
        .route(
            "/audit/run-full-scan",
            post(handlers::audit::run_full_scan_handler),
        )
        .route(
            "/audit/{service}/{resource_id}",
            post(handlers::audit::audit_resource_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
