//! Three-axis coordinator
//!
//! Owns the admission ceiling, per-session deadlines, the bounded history and
//! the background optimization loop:
//! - **Admission:** reserve-then-commit under one lock
//! - **Execution:** engine call raced against the session deadline
//! - **History:** FIFO ring of retired sessions

mod builder;
mod config;
mod core;
mod history;
mod state;
mod stats;

pub use builder::{CoordinatorBuilder, SynergyMode};
pub use config::CoordinatorConfig;
pub use core::ThreeAxisCoordinator;
pub use history::HistoryBuffer;
pub use stats::CoordinatorStats;
