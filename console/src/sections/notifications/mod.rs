//! Leave reminders: polling, de-duplication, and alerts.

pub mod alerts;
pub mod center;
pub mod poller;
pub mod source;

pub use alerts::{AlertSink, TerminalAlertSink};
pub use center::{NotificationCenter, PollOutcome};
pub use poller::PollerHandle;
pub use source::NotificationSource;
