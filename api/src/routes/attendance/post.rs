use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::common::{
    AttendanceSessionResponse, CreateSessionReq, ErrorResponse, MarkAttendanceResponse, error_response,
    validation_response,
};
use crate::{auth::AuthUser, response::ApiResponse, state::AppState};

/// POST `/api/attendance/sessions`
///
/// Opens an ACTIVE attendance session on a module.
///
/// **Auth**: lecturer or assistant lecturer of the module, or admin.
///
/// **Body**
/// ```json
/// { "module_id": 1, "title": "Lecture 5" }
/// ```
///
/// **Responses**: `201` session, `403`, `404` unknown module, `422` invalid title.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateSessionReq>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceSessionResponse>>), ErrorResponse> {
    let body = body.trimmed();
    body.validate().map_err(|e| validation_response(&e))?;

    let session = state
        .attendance()
        .create_session(&user.actor(), body.module_id, body.title.as_deref())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            AttendanceSessionResponse::from(session),
            "Attendance session created",
        )),
    ))
}

/// POST `/api/attendance/mark/{session_id}`
///
/// Marks the caller present. Repeating the call is harmless.
///
/// **Auth**: student of the session's module.
///
/// **Responses**
/// - `201` `{ "already_marked": false, "record": { ... } }`
/// - `200` `{ "already_marked": true, "record": { ... } }` with the first record
/// - `409` session closed
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<MarkAttendanceResponse>>), ErrorResponse> {
    let outcome = state
        .attendance()
        .mark_attendance(&user.actor(), session_id)
        .await
        .map_err(error_response)?;

    let already_marked = outcome.already_marked();
    let (status, message) = if already_marked {
        (StatusCode::OK, "Attendance already recorded")
    } else {
        (StatusCode::CREATED, "Attendance recorded")
    };

    Ok((
        status,
        Json(ApiResponse::success(
            MarkAttendanceResponse {
                already_marked,
                record: outcome.into_record(),
            },
            message,
        )),
    ))
}
