use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

mod common;
mod get;
mod patch;
mod post;

pub use common::{AttendanceSessionResponse, CreateSessionReq, MarkAttendanceResponse};
pub use get::{export_session_csv, get_session_report, list_active_sessions, list_all_sessions};
pub use patch::close_session;
pub use post::{create_session, mark_attendance};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}", get(get_session_report))
        .route("/sessions/{session_id}/close", patch(close_session))
        .route("/mark/{session_id}", post(mark_attendance))
        .route("/modules/{module_id}/active", get(list_active_sessions))
        .route("/modules/{module_id}/all", get(list_all_sessions))
        .route("/export/{session_id}", get(export_session_csv))
}
