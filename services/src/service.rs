use std::sync::Arc;

use db::models::{attendance_session, module};
use sea_orm::DatabaseConnection;

use crate::collaborators::{AccessPolicy, DbEnrollment, EnrollmentDirectory, RoleAccessPolicy};
use crate::error::{AttendanceError, AttendanceResult};

/// Entry point for every attendance operation.
///
/// Cheap to clone; the connection pool and both collaborators are shared.
#[derive(Clone)]
pub struct AttendanceService {
    pub(crate) db: DatabaseConnection,
    pub(crate) enrollment: Arc<dyn EnrollmentDirectory>,
    pub(crate) access: Arc<dyn AccessPolicy>,
}

impl AttendanceService {
    pub fn new(
        db: DatabaseConnection,
        enrollment: Arc<dyn EnrollmentDirectory>,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self { db, enrollment, access }
    }

    /// Service wired to the database-backed enrollment and role policy.
    pub fn with_database(db: DatabaseConnection) -> Self {
        let enrollment = Arc::new(DbEnrollment::new(db.clone()));
        let access = Arc::new(RoleAccessPolicy::new(db.clone()));
        Self::new(db, enrollment, access)
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) async fn load_session(&self, session_id: i64) -> AttendanceResult<attendance_session::Model> {
        attendance_session::Model::get_by_id(&self.db, session_id)
            .await?
            .ok_or_else(|| AttendanceError::session_not_found(session_id))
    }

    pub(crate) async fn load_module(&self, module_id: i64) -> AttendanceResult<module::Model> {
        module::Model::get_by_id(&self.db, module_id)
            .await?
            .ok_or_else(|| AttendanceError::module_not_found(module_id))
    }
}
