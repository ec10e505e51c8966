//! Reminder de-duplication across polls.

use std::collections::HashSet;

use crate::models::notification::LeaveNotification;
use crate::types::NotificationId;

/// Remembers which reminder ids have already been surfaced.
///
/// The first successful poll only seeds the set so that reminders already
/// waiting at sign-in do not all fire at once. Ids are never forgotten while
/// the tracker lives.
#[derive(Debug, Default)]
pub struct SeenTracker {
    seen: HashSet<NotificationId>,
    seeded: bool,
}

impl SeenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `batch` and returns the reminders not seen in any earlier
    /// batch, in server order.
    pub fn observe<'a>(&mut self, batch: &'a [LeaveNotification]) -> Vec<&'a LeaveNotification> {
        if !self.seeded {
            self.seeded = true;
            self.seen.extend(batch.iter().map(|n| n.id));
            return Vec::new();
        }
        batch
            .iter()
            .filter(|n| self.seen.insert(n.id))
            .collect()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.seeded = false;
    }
}

/// Text on the bell badge; `None` hides it.
pub fn badge_text(unread: u32) -> Option<String> {
    match unread {
        0 => None,
        1..=99 => Some(unread.to_string()),
        _ => Some("99+".to_string()),
    }
}
