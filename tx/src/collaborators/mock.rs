//! Mock collaborators for unit tests

use super::*;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Mock coordination engine with scriptable delay and failure modes
pub struct MockEngine {
    delay: Duration,
    fail_initiate: bool,
    fail_execute: bool,
    fail_terminate: bool,
    panic_execute: bool,
    partial: bool,
    progress: f64,
    pub initiated: AtomicUsize,
    pub executed: AtomicUsize,
    pub finished: AtomicUsize,
    pub monitored: AtomicUsize,
    pub terminated: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        debug!("MockEngine::new: called");
        Self {
            delay: Duration::ZERO,
            fail_initiate: false,
            fail_execute: false,
            fail_terminate: false,
            panic_execute: false,
            partial: false,
            progress: 1.0,
            initiated: AtomicUsize::new(0),
            executed: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            monitored: AtomicUsize::new(0),
            terminated: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn failing_initiate(mut self) -> Self {
        self.fail_initiate = true;
        self
    }

    pub fn failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    /// Record terminate calls but report every one as failed
    pub fn failing_terminate(mut self) -> Self {
        self.fail_terminate = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_execute = true;
        self
    }

    /// Respond without a thought result
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    pub fn terminated(&self) -> Vec<String> {
        self.terminated.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CoordinationEngine for MockEngine {
    async fn initiate(&self, request: &CoordinationRequest) -> CollabResult<CoordinationSession> {
        debug!(entity_id = %request.entity_id, "MockEngine::initiate: called");
        self.initiated.fetch_add(1, Ordering::SeqCst);
        if self.fail_initiate {
            return Err(CollaboratorError::InvalidInput("mock initiate failure".to_string()));
        }
        Ok(CoordinationSession::new(request.clone()))
    }

    async fn execute(&self, session: CoordinationSession, cancel: CancellationToken) -> CollabResult<CoordinationResponse> {
        debug!(session_id = %session.id, "MockEngine::execute: called");
        self.executed.fetch_add(1, Ordering::SeqCst);
        if self.panic_execute {
            panic!("mock engine panicked");
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(CollaboratorError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        self.finished.fetch_add(1, Ordering::SeqCst);

        if self.fail_execute {
            return Err(CollaboratorError::failed("mock execution failure"));
        }

        Ok(CoordinationResponse {
            request_id: session.request.request_id.clone(),
            session_id: session.id.clone(),
            sequence: Some(SequenceResult {
                level: 6,
                ..Default::default()
            }),
            composition: Some(CompositionResult {
                layer: "C3".to_string(),
                ..Default::default()
            }),
            thought: (!self.partial).then(|| ThoughtResult {
                depth: 0.6,
                ..Default::default()
            }),
            process_time_ms: self.delay.as_millis() as u64,
        })
    }

    async fn monitor(&self, session_id: &str) -> CollabResult<CoordinationStatus> {
        debug!(%session_id, "MockEngine::monitor: called");
        self.monitored.fetch_add(1, Ordering::SeqCst);
        Ok(CoordinationStatus {
            session_id: session_id.to_string(),
            phase: "processing".to_string(),
            progress: self.progress,
            current_step: "mock".to_string(),
            completed_steps: Vec::new(),
            pending_steps: Vec::new(),
            last_updated: Utc::now(),
        })
    }

    async fn terminate(&self, session_id: &str) -> CollabResult<()> {
        debug!(%session_id, "MockEngine::terminate: called");
        if let Ok(mut terminated) = self.terminated.lock() {
            terminated.push(session_id.to_string());
        }
        if self.fail_terminate {
            return Err(CollaboratorError::failed("mock terminate failure"));
        }
        Ok(())
    }

    async fn evaluate_quality(&self, session: &CoordinationSession) -> CollabResult<QualityEvaluation> {
        debug!(session_id = %session.id, "MockEngine::evaluate_quality: called");
        Ok(QualityEvaluation {
            session_id: session.id.clone(),
            overall_score: 0.5,
            dimensions: Vec::new(),
            evaluated_at: Utc::now(),
        })
    }
}

/// Mock balance optimizer reporting a fixed overall balance
pub struct MockBalanceOptimizer {
    overall_balance: f64,
    pub optimize_calls: AtomicUsize,
}

impl MockBalanceOptimizer {
    pub fn new(overall_balance: f64) -> Self {
        Self {
            overall_balance,
            optimize_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BalanceOptimizer for MockBalanceOptimizer {
    async fn analyze(&self, coordinate: &Coordinate) -> CollabResult<BalanceAnalysis> {
        Ok(BalanceAnalysis {
            id: "analysis-mock".to_string(),
            entity_id: coordinate.entity_id.clone(),
            overall_balance: self.overall_balance,
            axis_balances: BTreeMap::new(),
            imbalances: Vec::new(),
            recommendations: Vec::new(),
            analyzed_at: Utc::now(),
        })
    }

    async fn optimize(&self, coordinate: &Coordinate, _constraints: &[Constraint]) -> CollabResult<BalanceOptimization> {
        self.optimize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BalanceOptimization {
            id: "optimization-mock".to_string(),
            entity_id: coordinate.entity_id.clone(),
            current_balance: self.overall_balance,
            target_balance: 0.9,
            adjustments: vec![BalanceAdjustment {
                adjustment_id: "adj-1".to_string(),
                target_axis: "thought".to_string(),
                adjustment_type: "increase".to_string(),
                current_value: coordinate.thought,
                target_value: coordinate.thought + 0.1,
                change: 0.1,
                priority: 1,
                expected_impact: 0.2,
                steps: Vec::new(),
            }],
            expected_improvement: 0.9 - self.overall_balance,
            recommendations: Vec::new(),
            optimized_at: Utc::now(),
        })
    }

    async fn detect_imbalances(&self, _coordinate: &Coordinate) -> CollabResult<Vec<AxisImbalance>> {
        Ok(Vec::new())
    }

    async fn recommend_adjustments(&self, _imbalances: &[AxisImbalance]) -> CollabResult<Vec<BalanceAdjustment>> {
        Ok(Vec::new())
    }

    async fn validate_stability(&self, coordinate: &Coordinate) -> CollabResult<StabilityValidation> {
        Ok(StabilityValidation {
            id: "stability-mock".to_string(),
            entity_id: coordinate.entity_id.clone(),
            stability_score: self.overall_balance,
            is_stable: true,
            risks: Vec::new(),
            recommendations: Vec::new(),
            validated_at: Utc::now(),
        })
    }
}

/// Mock synergy catalyst returning fixed opportunities and recording what it catalyzed
pub struct MockSynergyCatalyst {
    opportunities: Vec<SynergyOpportunity>,
    pub catalyzed: Mutex<Vec<String>>,
}

impl MockSynergyCatalyst {
    pub fn new(opportunities: Vec<SynergyOpportunity>) -> Self {
        Self {
            opportunities,
            catalyzed: Mutex::new(Vec::new()),
        }
    }

    pub fn catalyzed(&self) -> Vec<String> {
        self.catalyzed.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SynergyCatalyst for MockSynergyCatalyst {
    async fn identify_opportunities(&self, _coordinate: &Coordinate) -> CollabResult<Vec<SynergyOpportunity>> {
        Ok(self.opportunities.clone())
    }

    async fn catalyze(&self, opportunity: &SynergyOpportunity) -> CollabResult<SynergyResult> {
        if let Ok(mut catalyzed) = self.catalyzed.lock() {
            catalyzed.push(opportunity.id.clone());
        }
        Ok(SynergyResult {
            opportunity_id: opportunity.id.clone(),
            success: true,
            effectiveness_score: opportunity.score(),
            ..SynergyResult::none()
        })
    }

    async fn measure_effectiveness(&self, result: &SynergyResult) -> CollabResult<SynergyMeasurement> {
        Ok(SynergyMeasurement {
            result_id: result.opportunity_id.clone(),
            metrics: Vec::new(),
            overall_score: result.effectiveness_score,
            recommendations: Vec::new(),
            measured_at: Utc::now(),
        })
    }

    async fn optimize_conditions(&self, conditions: &[SynergyCondition]) -> CollabResult<SynergyOptimization> {
        Ok(SynergyOptimization {
            conditions: conditions.to_vec(),
            optimized_conditions: conditions.to_vec(),
            expected_benefit: 0.0,
            optimized_at: Utc::now(),
        })
    }

    async fn predict_outcomes(&self, _scenarios: &[SynergyScenario]) -> CollabResult<Vec<SynergyPrediction>> {
        Ok(Vec::new())
    }
}

/// Axis processor that fails every call
pub struct FailingAxisProcessor;

#[async_trait]
impl SequenceProcessor for FailingAxisProcessor {
    async fn process(&self, _request: SequenceRequest) -> CollabResult<SequenceResult> {
        Err(CollaboratorError::failed("sequence axis down"))
    }

    async fn evaluate_capability(&self, entity_id: &str, _capability: &str) -> CollabResult<CapabilityEvaluation> {
        Err(CollaboratorError::SessionNotFound(entity_id.to_string()))
    }

    async fn optimize_progression(&self, _current: u32, _target: u32) -> CollabResult<SequenceOptimization> {
        Err(CollaboratorError::failed("sequence axis down"))
    }

    async fn predict_evolution(&self, _entity_id: &str) -> CollabResult<SequencePrediction> {
        Err(CollaboratorError::failed("sequence axis down"))
    }

    async fn requirements(&self, _level: u32) -> CollabResult<SequenceRequirements> {
        Err(CollaboratorError::failed("sequence axis down"))
    }
}

#[async_trait]
impl CompositionProcessor for FailingAxisProcessor {
    async fn process(&self, _request: CompositionRequest) -> CollabResult<CompositionResult> {
        Err(CollaboratorError::failed("composition axis down"))
    }

    async fn analyze_elements(&self, _elements: &[CompositionElement]) -> CollabResult<CompositionAnalysis> {
        Err(CollaboratorError::failed("composition axis down"))
    }
}

#[async_trait]
impl ThoughtProcessor for FailingAxisProcessor {
    async fn process(&self, _request: ThoughtRequest) -> CollabResult<ThoughtResult> {
        Err(CollaboratorError::failed("thought axis down"))
    }

    async fn evaluate_depth(&self, _thought: &Thought) -> CollabResult<ThoughtDepthEvaluation> {
        Err(CollaboratorError::failed("thought axis down"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_engine_honours_cancel() {
        let engine = MockEngine::new().with_delay(Duration::from_secs(10));
        let session = engine.initiate(&CoordinationRequest::new("E1")).await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = engine.execute(session, cancel).await;

        assert!(matches!(result, Err(CollaboratorError::Cancelled)));
        assert_eq!(engine.finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mock_engine_full_response() {
        let engine = MockEngine::new();
        let session = engine.initiate(&CoordinationRequest::new("E1")).await.unwrap();
        let response = engine.execute(session, CancellationToken::new()).await.unwrap();

        assert!((response.quality().unwrap() - 3.2).abs() < 1e-9);
    }
}
