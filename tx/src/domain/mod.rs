//! Domain types for three-axis coordination
//!
//! - Axis requests/results and their analytic helper outputs
//! - Coordination requests, sessions, responses and status
//! - History records
//! - Balance and synergy inputs/outputs passed to the optimizer seams

mod axis;
mod balance;
mod id;
mod record;
mod session;
mod synergy;

pub use axis::{
    CapabilityEvaluation, CompositionAnalysis, CompositionElement, CompositionRequest, CompositionResult, Difficulty,
    PredictionScenario, ProgressionStep, SequenceOptimization, SequencePrediction, SequenceRequest,
    SequenceRequirements, SequenceResult, Thought, ThoughtDepthEvaluation, ThoughtRequest, ThoughtResult,
    layer_ordinal, quality_score,
};
pub use balance::{
    AxisImbalance, BalanceAdjustment, BalanceAnalysis, BalanceOptimization, BalanceRecommendation, Constraint,
    Coordinate, StabilityValidation,
};
pub use id::generate_id;
pub use record::CoordinationRecord;
pub use session::{
    CoordinationRequest, CoordinationResponse, CoordinationSession, CoordinationStatus, QualityDimension,
    QualityEvaluation, SessionStatus, THREE_AXIS_SESSION,
};
pub use synergy::{
    SynergyCondition, SynergyImprovement, SynergyMeasurement, SynergyMetric, SynergyOpportunity, SynergyOptimization,
    SynergyOutcome, SynergyPrediction, SynergyResult, SynergyScenario, select_best,
};
