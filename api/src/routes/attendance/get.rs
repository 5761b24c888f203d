//! Read endpoints: session listings, the roster report and its CSV export.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use chrono::Utc;
use services::{
    RosterReport,
    export::{export_filename, to_csv},
};

use super::common::{AttendanceSessionResponse, ErrorResponse, error_response};
use crate::{auth::AuthUser, response::ApiResponse, state::AppState};

/// GET `/api/attendance/modules/{module_id}/active`
///
/// ACTIVE sessions of the module, newest first. Any member of the module.
pub async fn list_active_sessions(
    State(state): State<AppState>,
    Path(module_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AttendanceSessionResponse>>>), ErrorResponse> {
    let sessions = state
        .attendance()
        .active_sessions(&user.actor(), module_id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            sessions.into_iter().map(AttendanceSessionResponse::from).collect(),
            "Active attendance sessions retrieved",
        )),
    ))
}

/// GET `/api/attendance/modules/{module_id}/all`
///
/// Every session of the module, newest first. Instructors only.
pub async fn list_all_sessions(
    State(state): State<AppState>,
    Path(module_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AttendanceSessionResponse>>>), ErrorResponse> {
    let sessions = state
        .attendance()
        .all_sessions(&user.actor(), module_id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            sessions.into_iter().map(AttendanceSessionResponse::from).collect(),
            "Attendance sessions retrieved",
        )),
    ))
}

/// GET `/api/attendance/sessions/{session_id}`
///
/// Roster report: one row per enrolled student with present/absent and totals.
///
/// ```json
/// {
///   "session": { "id": 3, "title": "Lecture 5", "module_code": "COS301", "status": "closed", ... },
///   "rows": [ { "student_id": 7, "name": "ann", "email": "ann@up.ac.za", "present": true, "marked_at": "..." } ],
///   "total_students": 3, "present": 2, "absent": 1
/// }
/// ```
pub async fn get_session_report(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<RosterReport>>), ErrorResponse> {
    let report = state
        .attendance()
        .build_report(&user.actor(), session_id)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(report, "Attendance report retrieved")),
    ))
}

/// GET `/api/attendance/export/{session_id}`
///
/// **Response**: `text/csv` attachment with columns `name,email,status,marked_at`,
/// named `attendance_session_{id}_{YYYYMMDDTHHMMSSZ}.csv`.
pub async fn export_session_csv(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), ErrorResponse> {
    let report = state
        .attendance()
        .build_report(&user.actor(), session_id)
        .await
        .map_err(error_response)?;

    let filename = export_filename(session_id, Utc::now());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    tracing::info!(
        session_id,
        actor = user.0.sub,
        rows = report.rows.len(),
        "attendance exported"
    );
    Ok((StatusCode::OK, headers, to_csv(&report)))
}
