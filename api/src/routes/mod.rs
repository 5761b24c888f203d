//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → Health check endpoint (public)
//! - `/attendance` → Attendance sessions, marking, rosters and exports (authenticated users)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{attendance::attendance_routes, health::health_routes};
use crate::state::AppState;

pub mod attendance;
pub mod health;

/// Builds every route under `/api` and binds the state.
///
/// Module-level roles are enforced by the attendance operations themselves,
/// so the only layer here is the bearer token check.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
