//! Present/absent breakdown of a session against the module's enrollment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use db::models::attendance_session::SessionStatus;
use db::models::{attendance_record, attendance_session, module};
use sea_orm::TransactionTrait;
use serde::Serialize;

use crate::attendance_record::AttendanceRecord;
use crate::collaborators::{AccessLevel, Actor, EnrolledStudent, require};
use crate::error::{AttendanceError, AttendanceResult};
use crate::service::AttendanceService;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub title: String,
    pub module_id: i64,
    pub module_code: String,
    pub module_title: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    pub fn new(session: &attendance_session::Model, module: &module::Model) -> Self {
        Self {
            id: session.id,
            title: session.title.clone(),
            module_id: module.id,
            module_code: module.code.clone(),
            module_title: module.description.clone(),
            status: session.status,
            created_at: session.created_at,
            closed_at: session.closed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub present: bool,
    pub marked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterReport {
    pub session: SessionSummary,
    pub rows: Vec<RosterRow>,
    pub total_students: usize,
    pub present: usize,
    pub absent: usize,
}

impl RosterReport {
    /// Left-joins `students` against `records`. Every enrolled student yields
    /// exactly one row; records of students not in `students` are ignored.
    /// Rows are ordered by name, then student id.
    pub fn derive(session: SessionSummary, students: Vec<EnrolledStudent>, records: &[AttendanceRecord]) -> Self {
        let marked: HashMap<i64, DateTime<Utc>> = records.iter().map(|r| (r.user_id, r.taken_at)).collect();

        let mut rows: Vec<RosterRow> = students
            .into_iter()
            .map(|s| {
                let marked_at = marked.get(&s.student_id).copied();
                RosterRow {
                    student_id: s.student_id,
                    name: s.name,
                    email: s.email,
                    present: marked_at.is_some(),
                    marked_at,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.student_id.cmp(&b.student_id)));

        let present = rows.iter().filter(|r| r.present).count();
        Self {
            session,
            total_students: rows.len(),
            absent: rows.len() - present,
            present,
            rows,
        }
    }
}

impl AttendanceService {
    /// Builds the roster of `session_id`.
    ///
    /// The session and its records are read in one transaction so the report's
    /// status and rows agree. Enrollment is fetched before that transaction.
    pub async fn build_report(&self, actor: &Actor, session_id: i64) -> AttendanceResult<RosterReport> {
        let session = self.load_session(session_id).await?;
        require(self.access.as_ref(), actor, session.module_id, AccessLevel::Instructor).await?;

        let students = self.enrollment.students(session.module_id).await?;

        let txn = self.db.begin().await?;
        let session = attendance_session::Model::get_by_id(&txn, session_id)
            .await?
            .ok_or_else(|| AttendanceError::session_not_found(session_id))?;
        let module = module::Model::get_by_id(&txn, session.module_id)
            .await?
            .ok_or_else(|| AttendanceError::module_not_found(session.module_id))?;
        let records = attendance_record::Model::for_session(&txn, session_id).await?;
        txn.commit().await?;

        let report = RosterReport::derive(SessionSummary::new(&session, &module), students, &records);
        tracing::debug!(
            session_id,
            total = report.total_students,
            present = report.present,
            "roster built"
        );
        Ok(report)
    }
}
