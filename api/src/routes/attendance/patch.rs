use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::common::{AttendanceSessionResponse, ErrorResponse, error_response};
use crate::{auth::AuthUser, response::ApiResponse, state::AppState};

/// PATCH `/api/attendance/sessions/{session_id}/close`
///
/// Closes an ACTIVE session. Closing it again is `409 Conflict`.
pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceSessionResponse>>), ErrorResponse> {
    let session = state
        .attendance()
        .close_session(&user.actor(), session_id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            AttendanceSessionResponse::from(session),
            "Attendance session closed",
        )),
    ))
}
