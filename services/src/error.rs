use sea_orm::DbErr;
use thiserror::Error;

/// Everything an attendance operation can fail with.
///
/// A repeated mark is not an error; see [`crate::attendance_record::MarkOutcome`].
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Attendance session {0} is no longer accepting attendance")]
    SessionClosed(i64),

    #[error("Attendance session {0} is already closed")]
    AlreadyClosed(i64),

    #[error("{collaborator} lookup failed: {reason}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        reason: String,
    },

    #[error("storage failure: {0}")]
    StorageFailure(#[from] DbErr),
}

impl AttendanceError {
    pub fn session_not_found(id: i64) -> Self {
        Self::NotFound(format!("Attendance session {id}"))
    }

    pub fn module_not_found(id: i64) -> Self {
        Self::NotFound(format!("Module {id}"))
    }

    pub fn enrollment(reason: impl ToString) -> Self {
        Self::CollaboratorUnavailable {
            collaborator: "enrollment",
            reason: reason.to_string(),
        }
    }

    pub fn access(reason: impl ToString) -> Self {
        Self::CollaboratorUnavailable {
            collaborator: "authorization",
            reason: reason.to_string(),
        }
    }
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
