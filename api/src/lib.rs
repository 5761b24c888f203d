pub mod auth;
pub mod response;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;

use crate::{auth::middleware::log_request, routes::routes, state::AppState};

/// The full application: `/api` routes with request logging and CORS.
pub fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors)
}
