use chrono::{DateTime, SecondsFormat, Utc};

use crate::roster::RosterReport;

pub const CSV_HEADER: &str = "name,email,status,marked_at";

/// Renders a roster as CSV, one line per row after the header.
pub fn to_csv(report: &RosterReport) -> Vec<u8> {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for row in &report.rows {
        let status = if row.present { "Present" } else { "Absent" };
        let marked_at = row
            .marked_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();

        csv.push_str(&format!(
            "{},{},{},{}\n",
            esc(&row.name),
            esc(&row.email),
            status,
            esc(&marked_at)
        ));
    }

    csv.into_bytes()
}

/// `attendance_session_{id}_{YYYYMMDDTHHMMSSZ}.csv`
pub fn export_filename(session_id: i64, at: DateTime<Utc>) -> String {
    format!("attendance_session_{}_{}.csv", session_id, at.format("%Y%m%dT%H%M%SZ"))
}

fn esc(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
