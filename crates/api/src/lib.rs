//! HTTP API server with observability for the social feed.
//!
//! Provides REST endpoints for users, posts and follow relationships,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use domain::SocialEvent;
use event_store::EventStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/users", get(routes::users::list::<S>))
        .route(
            "/users/{name}",
            get(routes::users::get::<S>).put(routes::users::create::<S>),
        )
        .route("/users/{name}/wall", get(routes::users::wall::<S>))
        .route("/users/{name}/timeline", get(routes::users::timeline::<S>))
        .route(
            "/users/{name}/posts",
            axum::routing::post(routes::users::create_post::<S>),
        )
        .route(
            "/users/{name}/followed/{other}",
            put(routes::users::follow::<S>).delete(routes::users::unfollow::<S>),
        )
        .route("/posts", get(routes::posts::list::<S>))
        .route("/posts/{id}", get(routes::posts::get::<S>));

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .nest("/api", api)
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

/// Creates the default application state over the given event store.
pub fn create_default_state<S: EventStore<Event = SocialEvent> + Clone + 'static>(
    event_store: S,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(event_store))
}
