use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{lenient_f64, string_or_empty};
use crate::types::{AttendanceId, EmployeeId};
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttendanceStatus {
    #[default]
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "late")]
    Late,
    #[serde(rename = "half-day", alias = "half_day")]
    HalfDay,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half-day",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::HalfDay => "Half day",
        }
    }

    /// Late arrivals are on site and count as present for the dashboard.
    pub fn is_on_site(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "half-day" | "half_day" => Ok(AttendanceStatus::HalfDay),
            other => Err(ValidationError::Invalid(format!(
                "unknown attendance status: {}",
                other
            ))),
        }
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`; empty or null means not recorded.
fn optional_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_clock(&text)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid time: {}", text))),
    }
}

pub fn parse_clock(text: &str) -> Result<NaiveTime, chrono::ParseError> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    #[serde(rename = "employee")]
    pub employee_id: EmployeeId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "optional_time")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, deserialize_with = "optional_time")]
    pub check_out: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hours_worked: f64,
    #[serde(default)]
    pub status: AttendanceStatus,
}

/// Body of `POST /attendance/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceForm {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", with = "clock_format")]
    pub check_in: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none", with = "clock_format")]
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
}

impl AttendanceForm {
    pub fn new(
        employee: EmployeeId,
        date: NaiveDate,
        check_in: Option<NaiveTime>,
        check_out: Option<NaiveTime>,
        status: AttendanceStatus,
    ) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (check_in, check_out) {
            if end < start {
                return Err(ValidationError::Invalid(
                    "check_out: must not be before check_in".into(),
                ));
            }
        }
        Ok(Self {
            employee,
            date,
            check_in,
            check_out,
            status,
        })
    }
}

mod clock_format {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }
}
