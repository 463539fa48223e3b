//! Balance optimization types
//!
//! These are the inputs and outputs of the `BalanceOptimizer` seam. The
//! coordinator only reads `BalanceAnalysis::overall_balance`; everything else
//! passes through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::generate_id;

/// A point in the three-axis state space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub entity_id: String,
    pub sequence: f64,
    pub composition: f64,
    pub thought: f64,
}

impl Coordinate {
    pub fn new(entity_id: impl Into<String>, sequence: f64, composition: f64, thought: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            sequence,
            composition,
            thought,
        }
    }
}

/// Bound an optimizer must respect on one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub axis: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Scalar and per-axis balance of a coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAnalysis {
    pub id: String,
    pub entity_id: String,
    pub overall_balance: f64,
    pub axis_balances: std::collections::BTreeMap<String, f64>,
    pub imbalances: Vec<AxisImbalance>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisImbalance {
    pub axis_name: String,
    pub imbalance_type: String,
    pub severity: String,
    pub score: f64,
    pub target_score: f64,
    pub deviation: f64,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub adjustment_id: String,
    pub target_axis: String,
    pub adjustment_type: String,
    pub current_value: f64,
    pub target_value: f64,
    pub change: f64,
    pub priority: u32,
    pub expected_impact: f64,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecommendation {
    pub recommendation_id: String,
    pub title: String,
    pub description: String,
    pub target_axes: Vec<String>,
    pub expected_benefit: f64,
    pub confidence: f64,
}

/// Plan for moving a coordinate toward better balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceOptimization {
    pub id: String,
    pub entity_id: String,
    pub current_balance: f64,
    pub target_balance: f64,
    pub adjustments: Vec<BalanceAdjustment>,
    pub expected_improvement: f64,
    pub recommendations: Vec<BalanceRecommendation>,
    pub optimized_at: DateTime<Utc>,
}

impl BalanceOptimization {
    /// Optimization that leaves an already balanced coordinate as it is
    pub fn unchanged(analysis: &BalanceAnalysis) -> Self {
        Self {
            id: generate_id("balance", &analysis.entity_id),
            entity_id: analysis.entity_id.clone(),
            current_balance: analysis.overall_balance,
            target_balance: analysis.overall_balance,
            adjustments: Vec::new(),
            expected_improvement: 0.0,
            recommendations: Vec::new(),
            optimized_at: Utc::now(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.adjustments.is_empty() && self.current_balance == self.target_balance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityValidation {
    pub id: String,
    pub entity_id: String,
    pub stability_score: f64,
    pub is_stable: bool,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_unchanged_optimization() {
        let analysis = BalanceAnalysis {
            id: "analysis-1".to_string(),
            entity_id: "E1".to_string(),
            overall_balance: 0.85,
            axis_balances: BTreeMap::new(),
            imbalances: Vec::new(),
            recommendations: Vec::new(),
            analyzed_at: Utc::now(),
        };

        let optimization = BalanceOptimization::unchanged(&analysis);
        assert_eq!(optimization.current_balance, 0.85);
        assert_eq!(optimization.target_balance, 0.85);
        assert_eq!(optimization.expected_improvement, 0.0);
        assert!(optimization.is_noop());
    }
}
