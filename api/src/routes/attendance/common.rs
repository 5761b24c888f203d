use axum::{Json, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services::{AttendanceError, AttendanceRecord, AttendanceSession};
use validator::{Validate, ValidationErrors};

use crate::auth::guards::Empty;
use crate::response::ApiResponse;

pub type ErrorResponse = (StatusCode, Json<ApiResponse<Empty>>);

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionReq {
    pub module_id: i64,
    /// Blank or missing falls back to the default title.
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
}

impl CreateSessionReq {
    /// Trims the title so the length limit applies to what gets stored.
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_owned());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceSessionResponse {
    pub id: i64,
    pub module_id: i64,
    pub created_by: i64,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<AttendanceSession> for AttendanceSessionResponse {
    fn from(s: AttendanceSession) -> Self {
        Self {
            id: s.id,
            module_id: s.module_id,
            created_by: s.created_by,
            title: s.title,
            status: s.status.to_string(),
            created_at: s.created_at,
            closed_at: s.closed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkAttendanceResponse {
    pub already_marked: bool,
    pub record: AttendanceRecord,
}

/// Maps an attendance failure onto its status code and envelope.
///
/// Storage details are logged and replaced with a generic message.
pub fn error_response(err: AttendanceError) -> ErrorResponse {
    let status = match &err {
        AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
        AttendanceError::Forbidden(_) => StatusCode::FORBIDDEN,
        AttendanceError::SessionClosed(_) | AttendanceError::AlreadyClosed(_) => StatusCode::CONFLICT,
        AttendanceError::CollaboratorUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AttendanceError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        AttendanceError::StorageFailure(e) => {
            tracing::error!(error = %e, "attendance storage failure");
            "Internal server error".to_string()
        }
        AttendanceError::CollaboratorUnavailable { .. } => {
            tracing::error!(error = %err, "attendance collaborator unavailable");
            err.to_string()
        }
        _ => err.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}

pub fn validation_response(errors: &ValidationErrors) -> ErrorResponse {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())))
        .collect::<Vec<_>>()
        .join("; ");

    (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::error(message)))
}
