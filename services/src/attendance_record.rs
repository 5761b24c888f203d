//! Marking presence against an ACTIVE session.

use chrono::Utc;
use db::models::{attendance_record, attendance_session};
use sea_orm::DbErr;

use crate::collaborators::{AccessLevel, Actor, require};
use crate::error::{AttendanceError, AttendanceResult};
use crate::service::AttendanceService;

pub use db::models::attendance_record::Model as AttendanceRecord;

/// Result of a mark request. Both variants are successes for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    /// First mark; the record was written by this call.
    Recorded(AttendanceRecord),
    /// The student had already marked; this is the stored record.
    AlreadyMarked(AttendanceRecord),
}

impl MarkOutcome {
    pub fn record(&self) -> &AttendanceRecord {
        match self {
            MarkOutcome::Recorded(r) | MarkOutcome::AlreadyMarked(r) => r,
        }
    }

    pub fn into_record(self) -> AttendanceRecord {
        match self {
            MarkOutcome::Recorded(r) | MarkOutcome::AlreadyMarked(r) => r,
        }
    }

    pub fn already_marked(&self) -> bool {
        matches!(self, MarkOutcome::AlreadyMarked(_))
    }
}

impl AttendanceService {
    /// Records the actor as present in `session_id`.
    ///
    /// The ACTIVE check and the insert are a single statement, so a mark that
    /// reaches storage after the closing update has committed is rejected with
    /// `SessionClosed`, for every student.
    pub async fn mark_attendance(&self, actor: &Actor, session_id: i64) -> AttendanceResult<MarkOutcome> {
        let session = self.load_session(session_id).await?;
        if !session.is_active() {
            tracing::warn!(session_id, actor = actor.id, "mark rejected, session closed");
            return Err(AttendanceError::SessionClosed(session_id));
        }

        require(self.access.as_ref(), actor, session.module_id, AccessLevel::Student).await?;
        if !self.enrollment.is_enrolled(session.module_id, actor.id).await? {
            tracing::warn!(session_id, actor = actor.id, "mark rejected, not enrolled");
            return Err(AttendanceError::Forbidden(format!(
                "Not enrolled in module {}",
                session.module_id
            )));
        }

        let written = attendance_record::Model::insert_if_active(&self.db, session_id, actor.id, Utc::now()).await?;

        if written {
            let record = self.load_record(session_id, actor.id).await?.ok_or_else(|| {
                DbErr::RecordNotFound(format!("attendance record ({session_id}, {})", actor.id))
            })?;
            tracing::info!(session_id, student = actor.id, "attendance recorded");
            return Ok(MarkOutcome::Recorded(record));
        }

        // Nothing written: the session closed, or the pair already exists.
        let still_active = attendance_session::Model::get_by_id(&self.db, session_id)
            .await?
            .is_some_and(|s| s.is_active());
        if !still_active {
            tracing::warn!(session_id, actor = actor.id, "mark rejected, session closed");
            return Err(AttendanceError::SessionClosed(session_id));
        }

        match self.load_record(session_id, actor.id).await? {
            Some(existing) => {
                tracing::debug!(session_id, student = actor.id, "attendance already marked");
                Ok(MarkOutcome::AlreadyMarked(existing))
            }
            None => Err(AttendanceError::SessionClosed(session_id)),
        }
    }

    async fn load_record(&self, session_id: i64, user_id: i64) -> AttendanceResult<Option<AttendanceRecord>> {
        Ok(attendance_record::Model::find_for(&self.db, session_id, user_id).await?)
    }
}
