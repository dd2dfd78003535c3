pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod db;
pub mod models;
pub mod middleware;
pub mod forms;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::forms::registry::FormTypeRegistry;
use crate::middleware::admin_access::require_admin_access;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Router {
    let form_types = FormTypeRegistry::new(config.form_types.clone());
    tracing::info!(
        form_types = %form_types
            .keys()
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(","),
        "Form types registered"
    );

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        form_types,
    });

    let admin = views::view_routes()
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin_access,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            redirect_unauthorized,
        ));

    Router::new()
        .merge(admin)
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
