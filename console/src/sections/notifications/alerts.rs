//! Surfacing reminders to the person at the terminal.

use async_trait::async_trait;
use hrdesk_core::{reminders::badge_text, LeaveNotification};
use std::io::Write;
use std::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Receives one call per newly seen reminder plus the badge count after
/// every successful poll.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn alert(&self, reminder: &LeaveNotification);
    async fn badge(&self, unread: u32);
}

/// Prints a toast line and rings the terminal bell following the reminder's
/// tone pattern.
pub struct TerminalAlertSink {
    ring_bell: bool,
    last_badge: Mutex<Option<String>>,
}

impl TerminalAlertSink {
    pub fn new(ring_bell: bool) -> Self {
        Self {
            ring_bell,
            last_badge: Mutex::new(None),
        }
    }

    async fn play(&self, reminder: &LeaveNotification) {
        let tone = reminder.notification_type.tone();
        let start = Instant::now();
        for (frequency, offset) in tone.beeps() {
            sleep_until(start + offset).await;
            tracing::trace!(frequency, volume = tone.volume, "beep");
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }
}

impl Default for TerminalAlertSink {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl AlertSink for TerminalAlertSink {
    async fn alert(&self, reminder: &LeaveNotification) {
        tracing::info!(
            id = %reminder.id,
            kind = reminder.notification_type.as_str(),
            employee = %reminder.employee_name,
            "New leave reminder"
        );
        println!("🔔 {}", reminder.headline());
        if self.ring_bell {
            self.play(reminder).await;
        }
    }

    async fn badge(&self, unread: u32) {
        let text = badge_text(unread);
        let changed = match self.last_badge.lock() {
            Ok(mut last) if *last != text => {
                *last = text.clone();
                true
            }
            Ok(_) => false,
            Err(_) => true,
        };
        if changed {
            match text {
                Some(text) => println!("Unread reminders: {}", text),
                None => println!("No unread reminders"),
            }
        }
    }
}
