//! HTTP API server for the rod stock ledger.
//!
//! Exposes stock, process, group, report and snapshot operations as JSON
//! endpoints, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{Config, LogFormat};
pub use error::ApiError;
pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/stock",
            get(routes::stock::stats::<S>).post(routes::stock::deposit::<S>),
        )
        .route("/stock/available", get(routes::stock::available::<S>))
        .route("/stock/withdrawals", post(routes::stock::withdraw::<S>))
        .route("/history", get(routes::history::list::<S>))
        .route(
            "/diameters",
            get(routes::catalog::list_diameters::<S>).post(routes::catalog::register_diameter::<S>),
        )
        .route(
            "/blade-diameters",
            get(routes::catalog::list_blade_diameters::<S>)
                .post(routes::catalog::register_blade_diameter::<S>),
        )
        .route(
            "/processes",
            get(routes::processes::list::<S>).post(routes::processes::create::<S>),
        )
        .route("/processes/{id}", get(routes::processes::get::<S>))
        .route(
            "/processes/{id}/preview",
            post(routes::processes::preview::<S>),
        )
        .route(
            "/processes/{id}/finalize",
            post(routes::processes::finalize::<S>),
        )
        .route("/reports", get(routes::reports::kinds))
        .route("/reports/{kind}", get(routes::reports::get::<S>))
        .route(
            "/groups",
            get(routes::groups::list::<S>).post(routes::groups::create::<S>),
        )
        .route(
            "/groups/{id}",
            put(routes::groups::update::<S>).delete(routes::groups::delete::<S>),
        )
        .route("/export", get(routes::snapshot::export::<S>))
        .route("/import", post(routes::snapshot::import::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over a record store.
pub fn create_state<S: RecordStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
