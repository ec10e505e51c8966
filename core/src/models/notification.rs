//! Leave reminders produced by the backend ahead of an approved leave.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::string_or_empty;
use crate::types::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    /// Sent a week before the leave starts.
    #[serde(rename = "7days")]
    SevenDays,
    /// Sent the day before the leave starts.
    #[serde(rename = "eve")]
    Eve,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::SevenDays => "7days",
            NotificationType::Eve => "eve",
        }
    }

    /// Short tag shown next to the reminder.
    pub fn tag(&self) -> &'static str {
        match self {
            NotificationType::SevenDays => "D-7",
            NotificationType::Eve => "Eve",
        }
    }

    pub fn tone(&self) -> TonePattern {
        match self {
            NotificationType::SevenDays => TonePattern {
                frequencies_hz: &[880.0, 1046.0],
                delays_secs: &[0.0, 0.22],
                volume: 0.25,
            },
            NotificationType::Eve => TonePattern {
                frequencies_hz: &[880.0, 1100.0, 880.0],
                delays_secs: &[0.0, 0.18, 0.36],
                volume: 0.35,
            },
        }
    }
}

/// Short beep sequence played with each new reminder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonePattern {
    pub frequencies_hz: &'static [f32],
    pub delays_secs: &'static [f32],
    pub volume: f32,
}

impl TonePattern {
    /// Each beep with the offset at which it starts.
    pub fn beeps(&self) -> impl Iterator<Item = (f32, Duration)> + '_ {
        self.frequencies_hz
            .iter()
            .zip(self.delays_secs.iter())
            .map(|(freq, delay)| (*freq, Duration::from_secs_f32(*delay)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveNotification {
    pub id: NotificationId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub leave_type_display: String,
    pub leave_start_date: NaiveDate,
    pub leave_end_date: NaiveDate,
    pub notification_type: NotificationType,
    #[serde(default)]
    pub days_until_start: i64,
    #[serde(default)]
    pub is_read: bool,
}

impl LeaveNotification {
    /// "in 3 days", "starts today", "started 2 days ago".
    pub fn days_label(&self) -> String {
        days_label(self.days_until_start)
    }

    pub fn headline(&self) -> String {
        format!(
            "[{}] {} - {} {} ({} to {})",
            self.notification_type.tag(),
            self.employee_name,
            self.leave_type_display,
            self.days_label(),
            self.leave_start_date,
            self.leave_end_date
        )
    }
}

pub fn days_label(days: i64) -> String {
    match days {
        0 => "starts today".to_string(),
        1 => "in 1 day".to_string(),
        d if d > 1 => format!("in {} days", d),
        -1 => "started 1 day ago".to_string(),
        d => format!("started {} days ago", -d),
    }
}

/// Response of `GET /notifications/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<LeaveNotification>,
    #[serde(default)]
    pub unread_count: u32,
}
