//! CSV reports built from the cached collections.

use hrdesk_core::{AttendanceRecord, Employee, LeaveRequest};
use std::io::Write;
use thiserror::Error;

use crate::state::store::Snapshot;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Leaves,
    Attendance,
    Employees,
}

impl ExportKind {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportKind::Leaves => "leaves.csv",
            ExportKind::Attendance => "attendance.csv",
            ExportKind::Employees => "employees.csv",
        }
    }
}

fn needs_formula_guard(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

/// Prefixes cells a spreadsheet would evaluate as a formula.
fn cell(value: impl ToString) -> String {
    let mut value = value.to_string();
    if needs_formula_guard(&value) {
        value.insert(0, '\'');
    }
    value
}

/// Writes the rows for `kind` and returns how many were written.
pub fn export<W: Write>(kind: ExportKind, snapshot: &Snapshot, out: W) -> Result<usize, ExportError> {
    match kind {
        ExportKind::Leaves => write_leaves(&snapshot.leaves, out),
        ExportKind::Attendance => write_attendance(&snapshot.attendance, out),
        ExportKind::Employees => write_employees(&snapshot.employees, out),
    }
}

pub fn write_leaves<W: Write>(leaves: &[LeaveRequest], out: W) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "id", "employee", "type", "start", "end", "days", "status", "reason",
    ])?;
    for leave in leaves {
        writer.write_record([
            leave.id.to_string(),
            cell(&leave.employee_name),
            leave.leave_type.label().to_string(),
            leave.start_date.to_string(),
            leave.end_date.to_string(),
            leave.days.to_string(),
            leave.status.label().to_string(),
            cell(&leave.reason),
        ])?;
    }
    writer.flush()?;
    Ok(leaves.len())
}

pub fn write_attendance<W: Write>(
    rows: &[AttendanceRecord],
    out: W,
) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "date", "employee", "check_in", "check_out", "hours", "status",
    ])?;
    for row in rows {
        let clock = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
        };
        writer.write_record([
            row.date.to_string(),
            cell(&row.employee_name),
            clock(row.check_in),
            clock(row.check_out),
            format!("{:.2}", row.hours_worked),
            row.status.label().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(rows.len())
}

pub fn write_employees<W: Write>(employees: &[Employee], out: W) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "matricule",
        "last_name",
        "first_name",
        "email",
        "department",
        "direction",
        "position",
        "hire_date",
        "status",
        "retirement_year",
    ])?;
    for e in employees {
        writer.write_record([
            cell(&e.matricule),
            cell(&e.last_name),
            cell(&e.first_name),
            cell(&e.email),
            cell(&e.department_name),
            cell(&e.direction),
            cell(&e.position),
            e.hire_date.map(|d| d.to_string()).unwrap_or_default(),
            e.status.label().to_string(),
            e.retirement_year().map(|y| y.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(employees.len())
}
