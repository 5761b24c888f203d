//! Attendance sessions: opening and closing windows, recording presence
//! exactly once per student, and reporting the roster of a session.

pub mod attendance_record;
pub mod attendance_session;
pub mod collaborators;
pub mod error;
pub mod export;
pub mod roster;
pub mod service;


pub use attendance_record::{AttendanceRecord, MarkOutcome};
pub use attendance_session::AttendanceSession;
pub use collaborators::{AccessLevel, AccessPolicy, Actor, EnrolledStudent, EnrollmentDirectory};
pub use error::{AttendanceError, AttendanceResult};
pub use roster::{RosterReport, RosterRow, SessionSummary};
pub use service::AttendanceService;
