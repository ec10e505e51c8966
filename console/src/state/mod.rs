pub mod session;
pub mod store;

pub use session::{FileSessionStore, MemorySessionStore, Session, SessionManager, SessionStore};
pub use store::{AppStore, Snapshot};
