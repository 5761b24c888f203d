//! Interfaces to the subsystems attendance depends on but does not own:
//! the module enrollment list and the per-module authorization check.
//!
//! Both are object safe so the application state can hold them as
//! `Arc<dyn ...>` and tests can swap in failing fakes.

use async_trait::async_trait;
use db::models::{module, user_module_role};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use strum::Display;

use crate::error::{AttendanceError, AttendanceResult};

/// The verified caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub admin: bool,
}

impl Actor {
    pub fn new(id: i64, admin: bool) -> Self {
        Self { id, admin }
    }
}

/// What an operation needs from the actor on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessLevel {
    /// Any role on the module.
    Member,
    /// Enrolled as a student.
    Student,
    /// Lecturer or assistant lecturer.
    Instructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrolledStudent {
    pub student_id: i64,
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait EnrollmentDirectory: Send + Sync {
    /// Every student enrolled on `module_id`, in a stable order.
    async fn students(&self, module_id: i64) -> AttendanceResult<Vec<EnrolledStudent>>;

    async fn is_enrolled(&self, module_id: i64, student_id: i64) -> AttendanceResult<bool>;
}

#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn allows(&self, actor: &Actor, module_id: i64, level: AccessLevel) -> AttendanceResult<bool>;
}

/// Fails with `Forbidden` unless `policy` grants `level` to `actor` on `module_id`.
pub async fn require(
    policy: &dyn AccessPolicy,
    actor: &Actor,
    module_id: i64,
    level: AccessLevel,
) -> AttendanceResult<()> {
    if policy.allows(actor, module_id, level).await? {
        return Ok(());
    }

    tracing::warn!(actor = actor.id, module_id, ?level, "attendance access denied");
    Err(AttendanceError::Forbidden(format!(
        "{level} access to module {module_id} required"
    )))
}

/// Enrollment read from `user_module_roles` joined with `users`.
#[derive(Clone)]
pub struct DbEnrollment {
    db: DatabaseConnection,
}

impl DbEnrollment {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentDirectory for DbEnrollment {
    async fn students(&self, module_id: i64) -> AttendanceResult<Vec<EnrolledStudent>> {
        match module::Model::get_by_id(&self.db, module_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(AttendanceError::module_not_found(module_id)),
            Err(e) => return Err(AttendanceError::enrollment(e)),
        }

        let users = user_module_role::Model::students_for_module(&self.db, module_id)
            .await
            .map_err(AttendanceError::enrollment)?;

        Ok(users
            .into_iter()
            .map(|u| EnrolledStudent {
                student_id: u.id,
                name: u.username,
                email: u.email,
            })
            .collect())
    }

    async fn is_enrolled(&self, module_id: i64, student_id: i64) -> AttendanceResult<bool> {
        let role = user_module_role::Model::role_of(&self.db, student_id, module_id)
            .await
            .map_err(AttendanceError::enrollment)?;
        Ok(role == Some(user_module_role::Role::Student))
    }
}

/// Module-role based authorization. Admins pass everything except `Student`.
#[derive(Clone)]
pub struct RoleAccessPolicy {
    db: DatabaseConnection,
}

impl RoleAccessPolicy {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccessPolicy for RoleAccessPolicy {
    async fn allows(&self, actor: &Actor, module_id: i64, level: AccessLevel) -> AttendanceResult<bool> {
        if actor.admin && level != AccessLevel::Student {
            return Ok(true);
        }

        let role = user_module_role::Model::role_of(&self.db, actor.id, module_id)
            .await
            .map_err(AttendanceError::access)?;

        Ok(match (level, role) {
            (_, None) => false,
            (AccessLevel::Member, Some(_)) => true,
            (AccessLevel::Student, Some(r)) => r == user_module_role::Role::Student,
            (AccessLevel::Instructor, Some(r)) => r.is_instructor(),
        })
    }
}
