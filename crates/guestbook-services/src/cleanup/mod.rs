//! Rejected-content cleanup and its background scheduler.

mod scheduler;
mod service;

pub use scheduler::CleanupScheduler;
pub use service::{RejectedContentReaper, DEFAULT_RETENTION_DAYS};
