use std::sync::Arc;

use sea_orm::DatabaseConnection;
use services::{AccessPolicy, AttendanceService, EnrollmentDirectory};

/// Shared handler state: the connection pool and the attendance service
/// with its enrollment and authorization collaborators.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    attendance: AttendanceService,
}

impl AppState {
    /// State backed by the database enrollment and role policy.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            attendance: AttendanceService::with_database(db.clone()),
            db,
        }
    }

    pub fn with_collaborators(
        db: DatabaseConnection,
        enrollment: Arc<dyn EnrollmentDirectory>,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            attendance: AttendanceService::new(db.clone(), enrollment, access),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }
}
