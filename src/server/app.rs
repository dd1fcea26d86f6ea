//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{config::Settings, resolver::Resolver};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Token admission and provider scraping
    pub resolver: Arc<Resolver>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

/// Create the main Axum application with routes and middleware
///
/// Fails when the secret cannot key the codec or the provider settings are
/// unusable.
pub fn create_app(settings: Settings) -> crate::Result<Router> {
    let resolver = Arc::new(Resolver::new(&settings)?);
    Ok(create_app_with_resolver(settings, resolver))
}

/// Create the application around an existing resolver
///
/// Only the server section is read here; everything else is already baked
/// into the resolver.
pub fn create_app_with_resolver(settings: Settings, resolver: Arc<Resolver>) -> Router {
    let enable_cors = settings.server.enable_cors;

    let state = AppState {
        resolver,
        start_time: std::time::Instant::now(),
    };

    let router = Router::new()
        .route("/api", get(super::handlers::resolve))
        .route("/ping", get(super::handlers::ping));

    let router = if enable_cors {
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    } else {
        router.layer(TraceLayer::new_for_http())
    };

    router.with_state(state)
}
