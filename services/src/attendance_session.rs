//! Session lifecycle: open, close and list attendance windows of a module.

use chrono::Utc;
use db::models::attendance_session::{self, SessionStatus};

use crate::collaborators::{AccessLevel, Actor, require};
use crate::error::{AttendanceError, AttendanceResult};
use crate::service::AttendanceService;

pub use db::models::attendance_session::{DEFAULT_TITLE, Model as AttendanceSession};

impl AttendanceService {
    /// Opens a new ACTIVE session on `module_id`.
    ///
    /// Other ACTIVE sessions on the module are left open; their ids are logged.
    pub async fn create_session(
        &self,
        actor: &Actor,
        module_id: i64,
        title: Option<&str>,
    ) -> AttendanceResult<AttendanceSession> {
        require(self.access.as_ref(), actor, module_id, AccessLevel::Instructor).await?;
        self.load_module(module_id).await?;

        let open = attendance_session::Model::for_module(&self.db, module_id, Some(SessionStatus::Active)).await?;
        if !open.is_empty() {
            let open_ids: Vec<i64> = open.iter().map(|s| s.id).collect();
            tracing::warn!(
                module_id,
                ?open_ids,
                "opening attendance session while others are still active"
            );
        }

        let session = attendance_session::Model::create(&self.db, module_id, actor.id, title, Utc::now()).await?;

        tracing::info!(
            session_id = session.id,
            module_id,
            actor = actor.id,
            title = %session.title,
            "attendance session opened"
        );
        Ok(session)
    }

    /// Closes an ACTIVE session. A second close is `AlreadyClosed` and leaves
    /// the original closure time in place.
    ///
    /// The session is loaded before the access check, since its module decides
    /// who may close it.
    pub async fn close_session(&self, actor: &Actor, session_id: i64) -> AttendanceResult<AttendanceSession> {
        let session = self.load_session(session_id).await?;
        require(self.access.as_ref(), actor, session.module_id, AccessLevel::Instructor).await?;

        let closed_at = Utc::now().max(session.created_at);
        if !attendance_session::Model::close(&self.db, session_id, closed_at).await? {
            tracing::warn!(session_id, actor = actor.id, "attendance session already closed");
            return Err(AttendanceError::AlreadyClosed(session_id));
        }

        let closed = self.load_session(session_id).await?;
        tracing::info!(
            session_id,
            module_id = closed.module_id,
            actor = actor.id,
            "attendance session closed"
        );
        Ok(closed)
    }

    /// ACTIVE sessions of a module, newest first.
    pub async fn active_sessions(&self, actor: &Actor, module_id: i64) -> AttendanceResult<Vec<AttendanceSession>> {
        require(self.access.as_ref(), actor, module_id, AccessLevel::Member).await?;
        self.load_module(module_id).await?;

        Ok(attendance_session::Model::for_module(&self.db, module_id, Some(SessionStatus::Active)).await?)
    }

    /// Every session of a module regardless of status, newest first.
    pub async fn all_sessions(&self, actor: &Actor, module_id: i64) -> AttendanceResult<Vec<AttendanceSession>> {
        require(self.access.as_ref(), actor, module_id, AccessLevel::Instructor).await?;
        self.load_module(module_id).await?;

        Ok(attendance_session::Model::for_module(&self.db, module_id, None).await?)
    }
}
