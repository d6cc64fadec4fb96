//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the room service
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::auth::{Hs256TokenVerifier, TokenVerifier};
use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, StartupError};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> Result<Router, StartupError> {
    let verifier = Arc::new(Hs256TokenVerifier::new(config.jwt_secret.as_bytes()));
    let services = Arc::new(services::build_services(&config.storage).await?);
    Ok(build_router(services, verifier))
}

/// Assemble the router from already-built parts.
pub fn build_router(services: Arc<AppServices>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let auth_state = middleware::AuthState { verifier };

    // Protected routes: require a verified bearer token.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
