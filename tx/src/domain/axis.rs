//! Axis request and result types
//!
//! Three independent analytic axes feed a coordination session:
//! - **Sequence (S)**: capability level, lower is more advanced (0..=9)
//! - **Composition (C)**: structural layer, `C0`..`C5`
//! - **Thought (T)**: depth in `0.0..=1.0`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request for the sequence axis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceRequest {
    pub request_id: String,
    pub entity_id: String,
    #[serde(default)]
    pub target_level: Option<u32>,
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

/// Result of the sequence axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub level: u32,
    pub capabilities: Vec<String>,
    pub performance: BTreeMap<String, f64>,
    #[serde(default)]
    pub process_time_ms: u64,
}

/// A building block analysed by the composition axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionElement {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub complexity: f64,
}

impl CompositionElement {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, complexity: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            complexity,
        }
    }
}

/// Request for the composition axis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositionRequest {
    pub request_id: String,
    pub entity_id: String,
    #[serde(default)]
    pub elements: Vec<CompositionElement>,
}

/// Result of the composition axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    /// Layer tag, `C0`..`C5` for recognised layers
    pub layer: String,
    pub components: Vec<String>,
    #[serde(default)]
    pub architecture: BTreeMap<String, Value>,
    pub scalability: f64,
    #[serde(default)]
    pub process_time_ms: u64,
}

/// Request for the thought axis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThoughtRequest {
    pub request_id: String,
    pub entity_id: String,
    pub thought_content: String,
    #[serde(default)]
    pub target_depth: usize,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

/// Result of the thought axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtResult {
    pub realm: String,
    pub wisdom: Vec<String>,
    #[serde(default)]
    pub philosophy: BTreeMap<String, Value>,
    pub depth: f64,
    #[serde(default)]
    pub process_time_ms: u64,
}

/// Map a composition layer tag to its ordinal
///
/// `C0`..`C5` map to `0.0`..`5.0`; anything else maps to `0.0`.
pub fn layer_ordinal(layer: &str) -> f64 {
    match layer {
        "C0" => 0.0,
        "C1" => 1.0,
        "C2" => 2.0,
        "C3" => 3.0,
        "C4" => 4.0,
        "C5" => 5.0,
        _ => 0.0,
    }
}

/// Aggregate quality of a completed three-axis session
pub fn quality_score(sequence: &SequenceResult, composition: &CompositionResult, thought: &ThoughtResult) -> f64 {
    (f64::from(sequence.level) + layer_ordinal(&composition.layer) + thought.depth) / 3.0
}

// === Analytic helper outputs ===

/// Evaluation of a single capability for an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityEvaluation {
    pub entity_id: String,
    pub capability: String,
    pub current_level: f64,
    pub max_potential: f64,
    pub growth_rate: f64,
    pub bottlenecks: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub evaluation_score: f64,
    pub confidence: f64,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

/// One step of a sequence progression plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStep {
    pub step_id: String,
    pub from_level: u32,
    pub to_level: u32,
    pub description: String,
    pub priority: u32,
}

/// Plan for moving from one sequence level to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceOptimization {
    pub id: String,
    pub current_sequence: u32,
    pub target_sequence: u32,
    pub steps: Vec<ProgressionStep>,
    pub estimated_duration_hours: u64,
    pub success_probability: f64,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A possible outcome of a sequence prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionScenario {
    pub name: String,
    pub probability: f64,
    pub outcome: i64,
}

/// Forecast of an entity's next sequence level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencePrediction {
    pub entity_id: String,
    pub current_sequence: u32,
    pub predicted_sequence: u32,
    pub scenarios: Vec<PredictionScenario>,
    pub confidence: f64,
    pub factors: Vec<String>,
}

/// Difficulty band of a sequence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

/// What an entity needs to reach a sequence level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRequirements {
    pub sequence_level: u32,
    pub min_capabilities: BTreeMap<String, f64>,
    pub required_skills: Vec<String>,
    pub prerequisites: Vec<String>,
    pub estimated_days: u64,
    pub difficulty: Difficulty,
    pub success_rate: f64,
}

/// Structural analysis of a set of composition elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionAnalysis {
    pub element_count: usize,
    pub element_types: BTreeMap<String, usize>,
    pub average_complexity: f64,
    pub diversity: f64,
    pub coherence: f64,
}

/// A unit of thought whose depth can be evaluated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thought {
    pub id: String,
    pub content: String,
    pub depth: u32,
}

/// Depth evaluation of a single thought
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtDepthEvaluation {
    pub thought_id: String,
    pub current_depth: u32,
    pub max_possible_depth: u32,
    pub depth_score: f64,
}
