//! Three-axis coordinator
//!
//! Admits sessions up to a ceiling, runs each one on the coordination engine
//! under a deadline, records the outcome in a bounded history, and runs a
//! periodic background pass that flags stalled sessions.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::collaborators::{
    BalanceOptimizer, CompositionProcessor, CoordinationEngine, SequenceProcessor, ThoughtProcessor,
};
use crate::domain::{
    BalanceOptimization, CompositionRequest, CompositionResult, Constraint, Coordinate, CoordinationRecord,
    CoordinationRequest, CoordinationResponse, CoordinationSession, CoordinationStatus, QualityEvaluation,
    SequenceRequest, SequenceResult, SessionStatus, SynergyResult, ThoughtRequest, ThoughtResult, select_best,
};
use crate::error::{CollaboratorError, CoordinatorError, Result};

use super::builder::{CoordinatorBuilder, SynergyMode};
use super::config::CoordinatorConfig;
use super::state::{Counters, SharedState};
use super::stats::CoordinatorStats;

/// Handles owned while the coordinator is running
struct Lifecycle {
    stop: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Unregisters a session and stops its execution if the caller goes away mid-flight
struct InFlight<'a> {
    state: &'a SharedState,
    engine: &'a Arc<dyn CoordinationEngine>,
    session_id: String,
    cancel: CancellationToken,
    abort: AbortHandle,
    armed: bool,
}

impl InFlight<'_> {
    /// Disarm and take the session out of the active table
    fn finish(mut self) -> Option<CoordinationSession> {
        self.armed = false;
        self.state.unregister(&self.session_id)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(session_id = %self.session_id, "InFlight::drop: caller dropped, stopping execution");
            self.cancel.cancel();
            self.abort.abort();
            self.state.unregister(&self.session_id);

            // execute may never have been polled, so the engine still holds the session
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let engine = Arc::clone(self.engine);
                    let session_id = self.session_id.clone();
                    runtime.spawn(async move {
                        if let Err(e) = engine.terminate(&session_id).await {
                            debug!(%session_id, error = %e, "InFlight::drop: engine release failed");
                        }
                    });
                }
                Err(_) => {
                    warn!(session_id = %self.session_id, "InFlight::drop: no runtime, engine session not released");
                }
            }
        }
    }
}

/// Coordinates sessions across the sequence, composition and thought axes
pub struct ThreeAxisCoordinator {
    config: CoordinatorConfig,
    engine: Arc<dyn CoordinationEngine>,
    sequence: Option<Arc<dyn SequenceProcessor>>,
    composition: Option<Arc<dyn CompositionProcessor>>,
    thought: Option<Arc<dyn ThoughtProcessor>>,
    balance: Option<Arc<dyn BalanceOptimizer>>,
    synergy: SynergyMode,
    state: SharedState,
    counters: Counters,
    lifecycle: Mutex<Option<Lifecycle>>,
}

impl ThreeAxisCoordinator {
    pub fn builder(config: CoordinatorConfig) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    pub(super) fn from_parts(
        config: CoordinatorConfig,
        engine: Arc<dyn CoordinationEngine>,
        sequence: Option<Arc<dyn SequenceProcessor>>,
        composition: Option<Arc<dyn CompositionProcessor>>,
        thought: Option<Arc<dyn ThoughtProcessor>>,
        balance: Option<Arc<dyn BalanceOptimizer>>,
        synergy: SynergyMode,
    ) -> Self {
        debug!(
            max_concurrent = config.max_concurrent_coordinations,
            timeout_ms = config.coordination_timeout_ms,
            "ThreeAxisCoordinator::from_parts: called"
        );
        Self {
            state: SharedState::new(config.max_concurrent_coordinations, config.max_history_records),
            config,
            engine,
            sequence,
            composition,
            thought,
            balance,
            synergy,
            counters: Counters::default(),
            lifecycle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // === Session execution ===

    /// Admit, execute and retire one three-axis session
    pub async fn coordinate_three_axis(&self, request: CoordinationRequest) -> Result<CoordinationResponse> {
        debug!(entity_id = %request.entity_id, request_id = %request.request_id, "coordinate_three_axis: called");
        let slot = self.state.reserve(&self.counters)?;

        let mut session = self
            .engine
            .initiate(&request)
            .await
            .map_err(|e| CoordinatorError::execution("initiate_coordination", request.entity_id.clone(), e))?;
        if !session.advance(SessionStatus::Processing) {
            debug!(session_id = %session.id, status = %session.status, "coordinate_three_axis: engine returned non-initial status");
            session.status = SessionStatus::Processing;
        }
        let session_id = session.id.clone();
        slot.commit(session.clone(), &self.counters)?;
        Counters::bump(&self.counters.admitted);
        info!(%session_id, entity_id = %session.entity_id, "Coordination admitted");

        let timeout = self.config.coordination_timeout();
        let cancel = CancellationToken::new();
        let started = Instant::now();
        let engine = Arc::clone(&self.engine);
        let task_cancel = cancel.clone();
        let mut handle = tokio::spawn(async move { engine.execute(session, task_cancel).await });
        let in_flight = InFlight {
            state: &self.state,
            engine: &self.engine,
            session_id: session_id.clone(),
            cancel: cancel.clone(),
            abort: handle.abort_handle(),
            armed: true,
        };

        let outcome = tokio::select! {
            joined = &mut handle => match joined {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(e)) => Err(CoordinatorError::execution("execute_coordination", session_id.clone(), e)),
                Err(e) => Err(CoordinatorError::execution(
                    "execute_coordination",
                    session_id.clone(),
                    CollaboratorError::failed(format!("execution task ended abnormally: {}", e)),
                )),
            },
            _ = tokio::time::sleep(timeout) => {
                debug!(%session_id, ?timeout, "coordinate_three_axis: deadline reached");
                cancel.cancel();
                handle.abort();
                Err(CoordinatorError::Timeout {
                    session_id: session_id.clone(),
                    timeout,
                })
            }
        };

        if matches!(outcome, Err(CoordinatorError::Timeout { .. }))
            && let Err(e) = self.engine.terminate(&session_id).await
        {
            debug!(%session_id, error = %e, "coordinate_three_axis: engine release after deadline failed");
        }

        let elapsed = started.elapsed();
        let Some(mut session) = in_flight.finish() else {
            warn!(%session_id, "coordinate_three_axis: session vanished from active table");
            return outcome;
        };

        let status = match &outcome {
            Ok(_) => SessionStatus::Completed,
            Err(CoordinatorError::Timeout { .. }) => SessionStatus::Timeout,
            Err(_) => SessionStatus::Failed,
        };
        if let Ok(response) = &outcome {
            session.absorb(response);
        }
        session.advance(status);

        match status {
            SessionStatus::Completed => {
                Counters::bump(&self.counters.completed);
                info!(%session_id, elapsed_ms = elapsed.as_millis() as u64, "Coordination completed");
            }
            SessionStatus::Timeout => {
                Counters::bump(&self.counters.timed_out);
                warn!(%session_id, ?timeout, "Coordination timed out");
            }
            _ => {
                Counters::bump(&self.counters.failed);
                if let Err(e) = &outcome {
                    warn!(%session_id, error = %e, "Coordination failed");
                }
            }
        }

        if self.config.enable_history_tracking {
            self.record_history(&session, status, &outcome, elapsed);
        }
        outcome
    }

    fn record_history(
        &self,
        session: &CoordinationSession,
        status: SessionStatus,
        outcome: &Result<CoordinationResponse>,
        elapsed: Duration,
    ) {
        debug!(session_id = %session.id, %status, "record_history: called");
        let mut record =
            CoordinationRecord::for_session(session, status).with_detail("elapsed_ms", elapsed.as_millis() as u64);

        match outcome {
            Ok(response) => {
                record = record
                    .with_detail("response_id", response.request_id.clone())
                    .with_detail("process_time_ms", response.process_time_ms);
                if let Some(sequence) = &response.sequence {
                    record = record.with_detail("s_axis_level", sequence.level);
                }
                if let Some(composition) = &response.composition {
                    record = record.with_detail("c_axis_layer", composition.layer.clone());
                }
                if let Some(thought) = &response.thought {
                    record = record.with_detail("t_axis_depth", thought.depth);
                }
                if let Some(quality) = response.quality() {
                    record = record.with_detail("quality", quality);
                }
            }
            Err(e) => {
                record = record.with_metadata("error", e.to_string());
            }
        }

        let evicted = self.state.write().history.push(record);
        if evicted > 0 {
            debug!(evicted, "record_history: evicted oldest records");
        }
    }

    // === Axis delegation ===

    pub async fn process_sequence_axis(&self, request: SequenceRequest) -> Result<SequenceResult> {
        debug!(entity_id = %request.entity_id, "process_sequence_axis: called");
        let processor = self.sequence.as_ref().ok_or(CoordinatorError::Unavailable {
            component: "sequence processor",
            reason: "not configured",
        })?;
        let entity_id = request.entity_id.clone();
        processor
            .process(request)
            .await
            .map_err(|e| CoordinatorError::upstream("process_sequence_axis", entity_id, e))
    }

    pub async fn process_composition_axis(&self, request: CompositionRequest) -> Result<CompositionResult> {
        debug!(entity_id = %request.entity_id, "process_composition_axis: called");
        let processor = self.composition.as_ref().ok_or(CoordinatorError::Unavailable {
            component: "composition processor",
            reason: "not configured",
        })?;
        let entity_id = request.entity_id.clone();
        processor
            .process(request)
            .await
            .map_err(|e| CoordinatorError::upstream("process_composition_axis", entity_id, e))
    }

    pub async fn process_thought_axis(&self, request: ThoughtRequest) -> Result<ThoughtResult> {
        debug!(entity_id = %request.entity_id, "process_thought_axis: called");
        let processor = self.thought.as_ref().ok_or(CoordinatorError::Unavailable {
            component: "thought processor",
            reason: "not configured",
        })?;
        let entity_id = request.entity_id.clone();
        processor
            .process(request)
            .await
            .map_err(|e| CoordinatorError::upstream("process_thought_axis", entity_id, e))
    }

    // === Balance and synergy ===

    /// Rebalance a coordinate unless it already meets the balance threshold
    pub async fn optimize_balance(&self, coordinate: &Coordinate, constraints: &[Constraint]) -> Result<BalanceOptimization> {
        debug!(entity_id = %coordinate.entity_id, constraints = constraints.len(), "optimize_balance: called");
        let optimizer = self.balance.as_ref().ok_or(CoordinatorError::Unavailable {
            component: "balance optimizer",
            reason: "not configured",
        })?;

        let analysis = optimizer
            .analyze(coordinate)
            .await
            .map_err(|e| CoordinatorError::upstream("analyze_axis_balance", coordinate.entity_id.clone(), e))?;

        if analysis.overall_balance >= self.config.balance_threshold {
            debug!(
                overall_balance = analysis.overall_balance,
                threshold = self.config.balance_threshold,
                "optimize_balance: already balanced"
            );
            return Ok(BalanceOptimization::unchanged(&analysis));
        }

        optimizer
            .optimize(coordinate, constraints)
            .await
            .map_err(|e| CoordinatorError::upstream("optimize_balance", coordinate.entity_id.clone(), e))
    }

    /// Catalyze the best synergy opportunity for a coordinate
    pub async fn catalyze_synergy(&self, coordinate: &Coordinate) -> Result<SynergyResult> {
        debug!(entity_id = %coordinate.entity_id, "catalyze_synergy: called");
        let catalyst = match &self.synergy {
            SynergyMode::Enabled(catalyst) => catalyst,
            SynergyMode::Disabled => {
                return Err(CoordinatorError::Unavailable {
                    component: "synergy catalysis",
                    reason: "disabled by configuration",
                });
            }
            SynergyMode::NotConfigured => {
                return Err(CoordinatorError::Unavailable {
                    component: "synergy catalyst",
                    reason: "not configured",
                });
            }
        };

        let opportunities = catalyst
            .identify_opportunities(coordinate)
            .await
            .map_err(|e| CoordinatorError::upstream("identify_synergy_opportunities", coordinate.entity_id.clone(), e))?;

        let Some(best) = select_best(&opportunities) else {
            debug!("catalyze_synergy: no opportunities");
            return Ok(SynergyResult::none());
        };
        debug!(opportunity_id = %best.id, score = best.score(), candidates = opportunities.len(), "catalyze_synergy: selected");

        catalyst
            .catalyze(best)
            .await
            .map_err(|e| CoordinatorError::upstream("catalyze_synergy", best.id.clone(), e))
    }

    // === Queries ===

    pub async fn coordination_status(&self, session_id: &str) -> Result<CoordinationStatus> {
        debug!(%session_id, "coordination_status: called");
        self.engine
            .monitor(session_id)
            .await
            .map_err(|e| CoordinatorError::execution("monitor_coordination", session_id, e))
    }

    pub async fn evaluate_quality(&self, session: &CoordinationSession) -> Result<QualityEvaluation> {
        debug!(session_id = %session.id, "evaluate_quality: called");
        self.engine
            .evaluate_quality(session)
            .await
            .map_err(|e| CoordinatorError::execution("evaluate_coordination_quality", session.id.clone(), e))
    }

    /// IDs of active sessions, sorted
    pub fn active_coordinations(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.read().active.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of active sessions, oldest first
    pub fn active_sessions(&self) -> Vec<CoordinationSession> {
        let mut sessions: Vec<CoordinationSession> = self.state.read().active.values().cloned().collect();
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    /// The last `limit` history records, oldest first; `limit <= 0` returns all
    pub fn coordination_history(&self, limit: i64) -> Vec<CoordinationRecord> {
        debug!(%limit, "coordination_history: called");
        self.state.read().history.recent(limit)
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn stats(&self) -> CoordinatorStats {
        let (active, reserved, history) = {
            let state = self.state.read();
            (state.active.len(), state.reserved, state.history.len())
        };
        CoordinatorStats {
            is_running: self.is_running(),
            active_coordinations: active,
            reserved_slots: reserved,
            history_records: history,
            max_concurrent_coordinations: self.config.max_concurrent_coordinations,
            balance_threshold: self.config.balance_threshold,
            synergy_threshold: self.config.synergy_threshold,
            auto_balance_enabled: self.config.enable_auto_balance,
            synergy_catalysis_enabled: self.synergy.is_enabled(),
            history_tracking_enabled: self.config.enable_history_tracking,
            total_admitted: Counters::get(&self.counters.admitted),
            total_completed: Counters::get(&self.counters.completed),
            total_failed: Counters::get(&self.counters.failed),
            total_timed_out: Counters::get(&self.counters.timed_out),
            total_rejected: Counters::get(&self.counters.rejected),
            stalled_detections: Counters::get(&self.counters.stalled),
            peak_concurrent: self.counters.peak(),
        }
    }

    // === Lifecycle ===

    /// Mark the coordinator running and launch the background loop
    ///
    /// The loop ends when `root` is cancelled or `stop` is called.
    pub fn start(self: &Arc<Self>, root: CancellationToken) -> Result<()> {
        debug!("start: called");
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if lifecycle.is_some() {
            return Err(CoordinatorError::AlreadyRunning);
        }

        let stop = CancellationToken::new();
        let task = if self.config.enable_auto_balance {
            let coordinator = Arc::clone(self);
            let loop_stop = stop.clone();
            Some(tokio::spawn(async move {
                coordinator.run_optimization_loop(root, loop_stop).await;
            }))
        } else {
            debug!("start: auto balance disabled, no background loop");
            None
        };

        *lifecycle = Some(Lifecycle { stop, task });
        info!(
            max_concurrent = self.config.max_concurrent_coordinations,
            auto_balance = self.config.enable_auto_balance,
            "Three axis coordinator started"
        );
        Ok(())
    }

    /// Terminate active sessions and stop the background loop
    pub async fn stop(&self) -> Result<()> {
        debug!("stop: called");
        let lifecycle = self
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(CoordinatorError::NotRunning)?;

        let active = self.active_coordinations();
        info!(active = active.len(), "Stopping three axis coordinator");
        for session_id in &active {
            if let Err(e) = self.engine.terminate(session_id).await {
                warn!(%session_id, error = %e, "Failed to terminate coordination");
            }
        }

        lifecycle.stop.cancel();
        if let Some(task) = lifecycle.task
            && let Err(e) = task.await
        {
            warn!(error = %e, "Background optimization loop ended abnormally");
        }

        info!("Three axis coordinator stopped");
        Ok(())
    }

    async fn run_optimization_loop(&self, root: CancellationToken, stop: CancellationToken) {
        let period = self.config.optimization_interval();
        info!(?period, "Background optimization loop starting");

        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = root.cancelled() => {
                    debug!("run_optimization_loop: root cancelled");
                    break;
                }
                _ = stop.cancelled() => {
                    debug!("run_optimization_loop: stop requested");
                    break;
                }
                _ = interval.tick() => {
                    self.optimization_pass().await;
                }
            }
        }

        info!("Background optimization loop stopped");
    }

    /// Check every active session once; returns the IDs found below the quality threshold
    pub async fn optimization_pass(&self) -> Vec<String> {
        let session_ids = self.active_coordinations();
        debug!(count = session_ids.len(), "optimization_pass: called");

        let mut stalled = Vec::new();
        for session_id in session_ids {
            match self.engine.monitor(&session_id).await {
                Ok(status) if status.progress < self.config.quality_threshold => {
                    Counters::bump(&self.counters.stalled);
                    info!(
                        %session_id,
                        progress = status.progress,
                        threshold = self.config.quality_threshold,
                        "Background optimization triggered"
                    );
                    stalled.push(session_id);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(%session_id, error = %e, "optimization_pass: monitor failed");
                }
            }
        }
        stalled
    }
}
