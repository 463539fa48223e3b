//! Reference sequence (S) axis processor
//!
//! Scores are derived deterministically from the entity ID so that the same
//! entity always lands on the same level.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::collaborators::{CollabResult, SequenceProcessor};
use crate::domain::{
    CapabilityEvaluation, Difficulty, PredictionScenario, ProgressionStep, SequenceOptimization, SequencePrediction,
    SequenceRequest, SequenceRequirements, SequenceResult, generate_id,
};
use crate::error::CollaboratorError;

/// Highest (least advanced) sequence level
pub const MAX_SEQUENCE_LEVEL: u32 = 9;

const BASE_CAPABILITIES: [(&str, f64); 5] = [
    ("consciousness_level", 0.6),
    ("intelligence", 0.5),
    ("wisdom", 0.4),
    ("creativity", 0.7),
    ("adaptability", 0.6),
];

/// Sequence processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    #[serde(rename = "max-sequence-level")]
    pub max_sequence_level: u32,

    #[serde(rename = "min-sequence-level")]
    pub min_sequence_level: u32,

    #[serde(rename = "capability-threshold")]
    pub capability_threshold: f64,

    #[serde(rename = "evolution-speed-factor")]
    pub evolution_speed_factor: f64,

    #[serde(rename = "enable-prediction")]
    pub enable_prediction: bool,

    /// Prediction horizon in days
    #[serde(rename = "prediction-horizon-days")]
    pub prediction_horizon_days: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_sequence_level: MAX_SEQUENCE_LEVEL,
            min_sequence_level: 0,
            capability_threshold: 0.7,
            evolution_speed_factor: 1.0,
            enable_prediction: true,
            prediction_horizon_days: 30,
        }
    }
}

/// Deterministic sequence processor
pub struct DefaultSequenceProcessor {
    config: SequenceConfig,
}

impl DefaultSequenceProcessor {
    pub fn new(config: SequenceConfig) -> Self {
        debug!(?config, "DefaultSequenceProcessor::new: called");
        Self { config }
    }

    fn capabilities(entity_id: &str) -> BTreeMap<String, f64> {
        let bonus = (entity_id.len() % 10) as f64 / 10.0;
        BASE_CAPABILITIES
            .iter()
            .map(|(name, base)| (name.to_string(), base + bonus))
            .collect()
    }

    fn level_for(&self, capabilities: &BTreeMap<String, f64>) -> u32 {
        if capabilities.is_empty() {
            return self.config.max_sequence_level;
        }
        let avg = capabilities.values().sum::<f64>() / capabilities.len() as f64;
        let level = (9.0 - avg * 9.0).max(0.0) as u32;
        level.clamp(self.config.min_sequence_level, self.config.max_sequence_level)
    }

    fn current_level(entity_id: &str) -> u32 {
        5 + (entity_id.len() % 5) as u32
    }

    fn success_probability(gap: i64) -> f64 {
        if gap <= 1 {
            0.9
        } else if gap <= 3 {
            0.7
        } else {
            0.5
        }
    }

    fn difficulty(level: u32) -> Difficulty {
        match level {
            l if l > 7 => Difficulty::Beginner,
            l if l > 4 => Difficulty::Intermediate,
            l if l > 1 => Difficulty::Advanced,
            _ => Difficulty::Master,
        }
    }
}

impl Default for DefaultSequenceProcessor {
    fn default() -> Self {
        Self::new(SequenceConfig::default())
    }
}

#[async_trait]
impl SequenceProcessor for DefaultSequenceProcessor {
    async fn process(&self, request: SequenceRequest) -> CollabResult<SequenceResult> {
        debug!(entity_id = %request.entity_id, "DefaultSequenceProcessor::process: called");
        if request.entity_id.is_empty() {
            return Err(CollaboratorError::InvalidInput("entity_id is empty".to_string()));
        }

        let performance = Self::capabilities(&request.entity_id);
        let level = self.level_for(&performance);
        debug!(%level, "DefaultSequenceProcessor::process: level determined");

        Ok(SequenceResult {
            level,
            capabilities: performance.keys().cloned().collect(),
            performance,
            process_time_ms: 0,
        })
    }

    async fn evaluate_capability(&self, entity_id: &str, capability: &str) -> CollabResult<CapabilityEvaluation> {
        debug!(%entity_id, %capability, "DefaultSequenceProcessor::evaluate_capability: called");
        let len = capability.len() as f64;
        Ok(CapabilityEvaluation {
            entity_id: entity_id.to_string(),
            capability: capability.to_string(),
            current_level: 0.5 + (len / 10.0) / 20.0,
            max_potential: 0.8 + (len / 5.0) / 25.0,
            growth_rate: 0.1 + (len / 3.0) / 30.0,
            bottlenecks: vec![
                "resource_limitation".to_string(),
                "knowledge_gap".to_string(),
                "practice_deficit".to_string(),
            ],
            strengths: vec![
                "natural_talent".to_string(),
                "prior_experience".to_string(),
                "motivation".to_string(),
            ],
            weaknesses: vec![
                "inconsistent_practice".to_string(),
                "theoretical_gaps".to_string(),
                "environmental_constraints".to_string(),
            ],
            evaluation_score: 0.75,
            confidence: 0.85,
            evaluated_at: Utc::now(),
        })
    }

    async fn optimize_progression(&self, current: u32, target: u32) -> CollabResult<SequenceOptimization> {
        debug!(%current, %target, "DefaultSequenceProcessor::optimize_progression: called");
        if current > self.config.max_sequence_level || target > self.config.max_sequence_level {
            return Err(CollaboratorError::InvalidInput(format!(
                "sequence levels must be <= {}",
                self.config.max_sequence_level
            )));
        }

        let gap = i64::from(current) - i64::from(target);
        let steps = (target + 1..=current)
            .rev()
            .map(|level| ProgressionStep {
                step_id: format!("step-{}-to-{}", level, level - 1),
                from_level: level,
                to_level: level - 1,
                description: format!("Advance from sequence {} to {}", level, level - 1),
                priority: current - level + 1,
            })
            .collect();

        let mut risk_factors = Vec::new();
        if gap > 3 {
            risk_factors.push("large_sequence_gap".to_string());
        }
        if target < 3 {
            risk_factors.push("low_target_sequence".to_string());
        }

        let recommendations = if gap > 0 {
            vec![
                "Focus on capability enhancement".to_string(),
                "Increase training intensity".to_string(),
            ]
        } else {
            vec!["Maintain current level".to_string(), "Explore new domains".to_string()]
        };

        Ok(SequenceOptimization {
            id: generate_id("optimization", &format!("{}-{}", current, target)),
            current_sequence: current,
            target_sequence: target,
            steps,
            estimated_duration_hours: gap.max(0) as u64 * 24,
            success_probability: Self::success_probability(gap),
            risk_factors,
            recommendations,
        })
    }

    async fn predict_evolution(&self, entity_id: &str) -> CollabResult<SequencePrediction> {
        debug!(%entity_id, "DefaultSequenceProcessor::predict_evolution: called");
        if !self.config.enable_prediction {
            return Err(CollaboratorError::failed("sequence prediction is disabled"));
        }

        let current = Self::current_level(entity_id);
        let predicted = current.saturating_sub(1);
        let delta = (f64::from(current) - f64::from(predicted)).abs();
        let outcome = i64::from(predicted);

        Ok(SequencePrediction {
            entity_id: entity_id.to_string(),
            current_sequence: current,
            predicted_sequence: predicted,
            scenarios: vec![
                PredictionScenario {
                    name: "Optimistic".to_string(),
                    probability: 0.3,
                    outcome: outcome - 1,
                },
                PredictionScenario {
                    name: "Realistic".to_string(),
                    probability: 0.5,
                    outcome,
                },
                PredictionScenario {
                    name: "Conservative".to_string(),
                    probability: 0.2,
                    outcome: outcome + 1,
                },
            ],
            confidence: (1.0 - delta * 0.1).max(0.1),
            factors: vec![
                "meditation_practice".to_string(),
                "study_dedication".to_string(),
                "environmental_support".to_string(),
                "natural_aptitude".to_string(),
            ],
        })
    }

    async fn requirements(&self, level: u32) -> CollabResult<SequenceRequirements> {
        debug!(%level, "DefaultSequenceProcessor::requirements: called");
        if level > self.config.max_sequence_level {
            return Err(CollaboratorError::InvalidInput(format!("unknown sequence level {}", level)));
        }

        let remaining = f64::from(MAX_SEQUENCE_LEVEL.saturating_sub(level));
        let base = remaining / 9.0;
        let min_capabilities = BTreeMap::from([
            ("consciousness".to_string(), base),
            ("wisdom".to_string(), base * 0.8),
            ("intelligence".to_string(), base * 0.9),
        ]);

        let mut required_skills = vec![
            "meditation".to_string(),
            "contemplation".to_string(),
            "self_reflection".to_string(),
        ];
        if level < 5 {
            required_skills.push("advanced_consciousness_techniques".to_string());
        }

        Ok(SequenceRequirements {
            sequence_level: level,
            min_capabilities,
            required_skills,
            prerequisites: vec![format!("Completion of Sequence {}", level + 1)],
            estimated_days: (365.0 * remaining / 3.0) as u64,
            difficulty: Self::difficulty(level),
            success_rate: (f64::from(level) / 9.0).max(0.1),
        })
    }
}
