//! Synergy catalysis types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::balance::{Constraint, Coordinate};

/// A detected chance for the axes to reinforce each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyOpportunity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    pub potential: f64,
    pub feasibility: f64,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub conditions: Vec<SynergyCondition>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

impl SynergyOpportunity {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, potential: f64, feasibility: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            description: String::new(),
            coordinate: None,
            potential,
            feasibility,
            priority: 0,
            conditions: Vec::new(),
            benefits: Vec::new(),
            risks: Vec::new(),
        }
    }

    /// Impact is read from `potential`, so the effective weights are 0.7/0.3
    pub fn impact(&self) -> f64 {
        self.potential
    }

    /// Ranking score: `0.4·potential + 0.3·feasibility + 0.3·impact`
    pub fn score(&self) -> f64 {
        0.4 * self.potential + 0.3 * self.feasibility + 0.3 * self.impact()
    }
}

/// Pick the highest scoring opportunity, first seen wins on ties
pub fn select_best(opportunities: &[SynergyOpportunity]) -> Option<&SynergyOpportunity> {
    let mut best: Option<&SynergyOpportunity> = None;
    for candidate in opportunities {
        match best {
            Some(current) if candidate.score() <= current.score() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub required: bool,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyOutcome {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyImprovement {
    pub area: String,
    pub description: String,
    pub magnitude: f64,
    pub confidence: f64,
}

/// Outcome of catalyzing one opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyResult {
    pub opportunity_id: String,
    pub success: bool,
    pub effectiveness_score: f64,
    pub outcomes: Vec<SynergyOutcome>,
    pub improvements: Vec<SynergyImprovement>,
    #[serde(default)]
    pub lessons: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl SynergyResult {
    /// Zero-effect result for a coordinate with no opportunities
    pub fn none() -> Self {
        Self {
            opportunity_id: String::new(),
            success: false,
            effectiveness_score: 0.0,
            outcomes: Vec::new(),
            improvements: Vec::new(),
            lessons: Vec::new(),
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyMetric {
    pub name: String,
    pub value: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyMeasurement {
    pub result_id: String,
    pub metrics: Vec<SynergyMetric>,
    pub overall_score: f64,
    pub recommendations: Vec<String>,
    pub measured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyOptimization {
    pub conditions: Vec<SynergyCondition>,
    pub optimized_conditions: Vec<SynergyCondition>,
    pub expected_benefit: f64,
    pub optimized_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyScenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: Vec<SynergyCondition>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyPrediction {
    pub scenario_id: String,
    pub predicted_result: Option<SynergyResult>,
    pub confidence: f64,
    pub assumptions: Vec<String>,
    pub predicted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_potential_twice() {
        let opportunity = SynergyOpportunity::new("o1", "resonance", 0.9, 0.2);
        assert!((opportunity.score() - 0.69).abs() < 1e-9);

        let opportunity = SynergyOpportunity::new("o2", "resonance", 0.5, 0.9);
        assert!((opportunity.score() - 0.62).abs() < 1e-9);
    }

    #[test]
    fn test_select_best() {
        let opportunities = vec![
            SynergyOpportunity::new("o1", "resonance", 0.9, 0.2),
            SynergyOpportunity::new("o2", "amplification", 0.5, 0.9),
        ];
        assert_eq!(select_best(&opportunities).map(|o| o.id.as_str()), Some("o1"));
    }

    #[test]
    fn test_select_best_tie_keeps_first() {
        let opportunities = vec![
            SynergyOpportunity::new("first", "a", 0.5, 0.5),
            SynergyOpportunity::new("second", "b", 0.5, 0.5),
        ];
        assert_eq!(select_best(&opportunities).map(|o| o.id.as_str()), Some("first"));
    }

    #[test]
    fn test_select_best_empty() {
        assert!(select_best(&[]).is_none());
    }

    #[test]
    fn test_none_result() {
        let result = SynergyResult::none();
        assert!(!result.success);
        assert_eq!(result.effectiveness_score, 0.0);
        assert!(result.outcomes.is_empty());
        assert!(result.improvements.is_empty());
    }
}
