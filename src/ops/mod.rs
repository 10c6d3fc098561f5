pub mod history;
pub mod manager;
pub mod task_ops;

pub use manager::{Change, SubscriptionId, SyncError, TaskManager};
