pub mod repository;
pub mod types;
pub mod view_model;

pub use repository::LeavesRepository;
pub use types::{LeaveForm, LeaveRow};
pub use view_model::{LeavesViewModel, OwnLeaves};
