//! Coordinator statistics snapshot

use serde::{Deserialize, Serialize};

/// Point-in-time view of the coordinator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    pub is_running: bool,
    pub active_coordinations: usize,
    /// Slots reserved by sessions still being initiated
    pub reserved_slots: usize,
    pub history_records: usize,

    pub max_concurrent_coordinations: usize,
    pub balance_threshold: f64,
    pub synergy_threshold: f64,
    pub auto_balance_enabled: bool,
    pub synergy_catalysis_enabled: bool,
    pub history_tracking_enabled: bool,

    pub total_admitted: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub total_timed_out: u64,
    pub total_rejected: u64,
    /// Background ticks that found a session below the quality threshold
    pub stalled_detections: u64,
    pub peak_concurrent: usize,
}

impl CoordinatorStats {
    /// Sessions that reached a terminal status
    pub fn total_finished(&self) -> u64 {
        self.total_completed + self.total_failed + self.total_timed_out
    }
}
