//! Collaborator seams consumed by the coordinator
//!
//! Every analytic concern lives behind one of these traits. The coordinator
//! holds them as `Arc<dyn Trait>` and never depends on a concrete type.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    AxisImbalance, BalanceAdjustment, BalanceAnalysis, BalanceOptimization, CapabilityEvaluation,
    CompositionAnalysis, CompositionElement, CompositionRequest, CompositionResult, Constraint, Coordinate,
    CoordinationRequest, CoordinationResponse, CoordinationSession, CoordinationStatus, QualityEvaluation,
    SequenceOptimization, SequencePrediction, SequenceRequest, SequenceRequirements, SequenceResult,
    StabilityValidation, SynergyCondition, SynergyMeasurement, SynergyOpportunity, SynergyOptimization,
    SynergyPrediction, SynergyResult, SynergyScenario, Thought, ThoughtDepthEvaluation, ThoughtRequest,
    ThoughtResult,
};
use crate::error::CollaboratorError;

#[cfg(test)]
pub mod mock;

/// Result type returned by every collaborator
pub type CollabResult<T> = std::result::Result<T, CollaboratorError>;

/// Sequence (S) axis
#[async_trait]
pub trait SequenceProcessor: Send + Sync {
    async fn process(&self, request: SequenceRequest) -> CollabResult<SequenceResult>;

    async fn evaluate_capability(&self, entity_id: &str, capability: &str) -> CollabResult<CapabilityEvaluation>;

    /// Plan a move from `current` to `target` (lower levels are more advanced)
    async fn optimize_progression(&self, current: u32, target: u32) -> CollabResult<SequenceOptimization>;

    async fn predict_evolution(&self, entity_id: &str) -> CollabResult<SequencePrediction>;

    async fn requirements(&self, level: u32) -> CollabResult<SequenceRequirements>;
}

/// Composition (C) axis
#[async_trait]
pub trait CompositionProcessor: Send + Sync {
    async fn process(&self, request: CompositionRequest) -> CollabResult<CompositionResult>;

    async fn analyze_elements(&self, elements: &[CompositionElement]) -> CollabResult<CompositionAnalysis>;
}

/// Thought (T) axis
#[async_trait]
pub trait ThoughtProcessor: Send + Sync {
    async fn process(&self, request: ThoughtRequest) -> CollabResult<ThoughtResult>;

    async fn evaluate_depth(&self, thought: &Thought) -> CollabResult<ThoughtDepthEvaluation>;
}

/// Owns the actual cross-axis execution of a session
#[async_trait]
pub trait CoordinationEngine: Send + Sync {
    /// Create a session for a request; the coordinator registers it afterwards
    async fn initiate(&self, request: &CoordinationRequest) -> CollabResult<CoordinationSession>;

    /// Run a session to completion
    ///
    /// Implementations must return promptly once `cancel` fires; the
    /// coordinator cancels it when the session deadline passes.
    async fn execute(&self, session: CoordinationSession, cancel: CancellationToken) -> CollabResult<CoordinationResponse>;

    async fn monitor(&self, session_id: &str) -> CollabResult<CoordinationStatus>;

    async fn terminate(&self, session_id: &str) -> CollabResult<()>;

    async fn evaluate_quality(&self, session: &CoordinationSession) -> CollabResult<QualityEvaluation>;
}

/// Scores and rebalances a three-axis coordinate
#[async_trait]
pub trait BalanceOptimizer: Send + Sync {
    async fn analyze(&self, coordinate: &Coordinate) -> CollabResult<BalanceAnalysis>;

    async fn optimize(&self, coordinate: &Coordinate, constraints: &[Constraint]) -> CollabResult<BalanceOptimization>;

    async fn detect_imbalances(&self, coordinate: &Coordinate) -> CollabResult<Vec<AxisImbalance>>;

    async fn recommend_adjustments(&self, imbalances: &[AxisImbalance]) -> CollabResult<Vec<BalanceAdjustment>>;

    async fn validate_stability(&self, coordinate: &Coordinate) -> CollabResult<StabilityValidation>;
}

/// Discovers and exploits cross-axis synergy
#[async_trait]
pub trait SynergyCatalyst: Send + Sync {
    async fn identify_opportunities(&self, coordinate: &Coordinate) -> CollabResult<Vec<SynergyOpportunity>>;

    async fn catalyze(&self, opportunity: &SynergyOpportunity) -> CollabResult<SynergyResult>;

    async fn measure_effectiveness(&self, result: &SynergyResult) -> CollabResult<SynergyMeasurement>;

    async fn optimize_conditions(&self, conditions: &[SynergyCondition]) -> CollabResult<SynergyOptimization>;

    async fn predict_outcomes(&self, scenarios: &[SynergyScenario]) -> CollabResult<Vec<SynergyPrediction>>;
}
