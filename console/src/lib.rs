//! Native client for the HR backend: authenticated REST access with token
//! refresh, a reloadable record cache, the leave approval controller, and the
//! background leave-reminder poller.

pub mod api;
pub mod config;
pub mod console;
pub mod export;
pub mod sections;
pub mod state;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use console::Console;
