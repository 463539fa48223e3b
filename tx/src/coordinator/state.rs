//! Shared coordinator state and admission bookkeeping

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::domain::{CoordinationRecord, CoordinationSession};
use crate::error::{CollaboratorError, CoordinatorError, Result};

use super::history::HistoryBuffer;

/// Active sessions, pending reservations and history behind one lock
#[derive(Debug)]
pub(crate) struct CoordinatorState {
    pub(crate) active: HashMap<String, CoordinationSession>,
    pub(crate) reserved: usize,
    pub(crate) history: HistoryBuffer<CoordinationRecord>,
}

/// Lifetime counters, updated without taking the state lock
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) admitted: AtomicU64,
    pub(crate) completed: AtomicU64,
    pub(crate) failed: AtomicU64,
    pub(crate) timed_out: AtomicU64,
    pub(crate) rejected: AtomicU64,
    pub(crate) stalled: AtomicU64,
    pub(crate) peak_concurrent: AtomicUsize,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak_concurrent.load(Ordering::Relaxed)
    }
}

/// Lock wrapper; every update is a single step so a poisoned guard still holds consistent data
#[derive(Debug)]
pub(crate) struct SharedState {
    inner: RwLock<CoordinatorState>,
    max_active: usize,
}

impl SharedState {
    pub(crate) fn new(max_active: usize, history_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(CoordinatorState {
                active: HashMap::new(),
                reserved: 0,
                history: HistoryBuffer::new(history_capacity),
            }),
            max_active,
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CoordinatorState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CoordinatorState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check capacity and reserve a slot in one critical section
    pub(crate) fn reserve<'a>(&'a self, counters: &Counters) -> Result<AdmissionSlot<'a>> {
        let mut state = self.write();
        let occupied = state.active.len() + state.reserved;
        if occupied >= self.max_active {
            debug!(occupied, max = self.max_active, "SharedState::reserve: at capacity");
            Counters::bump(&counters.rejected);
            return Err(CoordinatorError::CapacityExceeded { max: self.max_active });
        }
        state.reserved += 1;
        debug!(occupied = occupied + 1, "SharedState::reserve: slot reserved");
        Ok(AdmissionSlot {
            state: self,
            committed: false,
        })
    }

    /// Remove a session from the active table
    pub(crate) fn unregister(&self, session_id: &str) -> Option<CoordinationSession> {
        self.write().active.remove(session_id)
    }
}

/// A reserved admission slot
///
/// Dropping an uncommitted slot gives the reservation back.
pub(crate) struct AdmissionSlot<'a> {
    state: &'a SharedState,
    committed: bool,
}

impl AdmissionSlot<'_> {
    /// Turn the reservation into an active session
    pub(crate) fn commit(mut self, session: CoordinationSession, counters: &Counters) -> Result<()> {
        let mut state = self.state.write();
        state.reserved = state.reserved.saturating_sub(1);
        self.committed = true;

        if state.active.contains_key(&session.id) {
            return Err(CoordinatorError::execution(
                "initiate_coordination",
                session.id.clone(),
                CollaboratorError::InvalidInput("duplicate session id".to_string()),
            ));
        }

        state.active.insert(session.id.clone(), session);
        counters
            .peak_concurrent
            .fetch_max(state.active.len(), Ordering::Relaxed);
        Ok(())
    }
}

impl Drop for AdmissionSlot<'_> {
    fn drop(&mut self) {
        if !self.committed {
            debug!("AdmissionSlot::drop: releasing uncommitted reservation");
            let mut state = self.state.write();
            state.reserved = state.reserved.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoordinationRequest;

    fn session(id: &str) -> CoordinationSession {
        CoordinationSession::with_id(id, CoordinationRequest::new("E1"))
    }

    #[test]
    fn test_reserve_counts_pending_slots() {
        let state = SharedState::new(2, 10);
        let counters = Counters::default();

        let a = state.reserve(&counters).unwrap();
        let _b = state.reserve(&counters).unwrap();
        assert!(matches!(
            state.reserve(&counters),
            Err(CoordinatorError::CapacityExceeded { max: 2 })
        ));
        assert_eq!(Counters::get(&counters.rejected), 1);

        drop(a);
        assert_eq!(state.read().reserved, 1);
        assert!(state.reserve(&counters).is_ok());
    }

    #[test]
    fn test_commit_moves_reservation_to_active() {
        let state = SharedState::new(1, 10);
        let counters = Counters::default();

        let slot = state.reserve(&counters).unwrap();
        slot.commit(session("s-1"), &counters).unwrap();

        let snapshot = state.read();
        assert_eq!(snapshot.reserved, 0);
        assert!(snapshot.active.contains_key("s-1"));
        drop(snapshot);
        assert_eq!(counters.peak(), 1);

        assert!(state.reserve(&counters).is_err());
        assert!(state.unregister("s-1").is_some());
        assert!(state.unregister("s-1").is_none());
        assert!(state.reserve(&counters).is_ok());
    }

    #[test]
    fn test_commit_rejects_duplicate_id() {
        let state = SharedState::new(3, 10);
        let counters = Counters::default();

        state.reserve(&counters).unwrap().commit(session("dup"), &counters).unwrap();
        let err = state
            .reserve(&counters)
            .unwrap()
            .commit(session("dup"), &counters)
            .unwrap_err();

        assert!(err.to_string().contains("duplicate"));
        let snapshot = state.read();
        assert_eq!(snapshot.active.len(), 1);
        assert_eq!(snapshot.reserved, 0);
    }
}
