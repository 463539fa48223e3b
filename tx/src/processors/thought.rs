//! Reference thought (T) axis processor

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::debug;

use crate::collaborators::{CollabResult, ThoughtProcessor};
use crate::domain::{Thought, ThoughtDepthEvaluation, ThoughtRequest, ThoughtResult};

/// Realms ordered by target depth
const REALMS: [&str; 7] = [
    "perception",
    "reflection",
    "reasoning",
    "insight",
    "understanding",
    "wisdom",
    "transcendence",
];

const UNCHARTED_REALM: &str = "uncharted";

/// Content length at which depth saturates
const SATURATION_CHARS: f64 = 1000.0;

/// Thought processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtConfig {
    #[serde(rename = "max-thought-depth")]
    pub max_thought_depth: u32,

    /// Scale applied to saturated content depth
    #[serde(rename = "depth-scale")]
    pub depth_scale: f64,

    #[serde(rename = "wisdom-threshold")]
    pub wisdom_threshold: f64,
}

impl Default for ThoughtConfig {
    fn default() -> Self {
        Self {
            max_thought_depth: 10,
            depth_scale: 0.8,
            wisdom_threshold: 0.8,
        }
    }
}

pub struct DefaultThoughtProcessor {
    config: ThoughtConfig,
}

impl DefaultThoughtProcessor {
    pub fn new(config: ThoughtConfig) -> Self {
        debug!(?config, "DefaultThoughtProcessor::new: called");
        Self { config }
    }

    fn content_depth(&self, content: &str) -> f64 {
        let chars = content.chars().count() as f64;
        (chars / SATURATION_CHARS).min(1.0) * self.config.depth_scale
    }

    fn realm(target_depth: usize) -> &'static str {
        REALMS.get(target_depth).copied().unwrap_or(UNCHARTED_REALM)
    }

    fn wisdom(context: &BTreeMap<String, Value>) -> Vec<String> {
        let mut wisdom = vec![
            "Stillness precedes clarity".to_string(),
            "Balance is found between the axes, not on any one of them".to_string(),
        ];
        if let Some(domain) = context.get("domain") {
            let domain = domain.as_str().map(str::to_string).unwrap_or_else(|| domain.to_string());
            wisdom.push(format!("Insight in {}", domain));
        }
        wisdom
    }

    fn philosophy(requirements: &[String]) -> BTreeMap<String, Value> {
        let mut philosophy = BTreeMap::from([
            ("core_principle".to_string(), json!("harmony")),
            ("methodology".to_string(), json!("contemplative_inquiry")),
            ("values".to_string(), json!(["clarity", "balance", "compassion"])),
        ]);
        if !requirements.is_empty() {
            philosophy.insert("specific_focus".to_string(), json!(requirements));
        }
        philosophy
    }
}

impl Default for DefaultThoughtProcessor {
    fn default() -> Self {
        Self::new(ThoughtConfig::default())
    }
}

#[async_trait]
impl ThoughtProcessor for DefaultThoughtProcessor {
    async fn process(&self, request: ThoughtRequest) -> CollabResult<ThoughtResult> {
        debug!(entity_id = %request.entity_id, target_depth = request.target_depth, "DefaultThoughtProcessor::process: called");
        Ok(ThoughtResult {
            realm: Self::realm(request.target_depth).to_string(),
            wisdom: Self::wisdom(&request.context),
            philosophy: Self::philosophy(&request.requirements),
            depth: self.content_depth(&request.thought_content),
            process_time_ms: 0,
        })
    }

    async fn evaluate_depth(&self, thought: &Thought) -> CollabResult<ThoughtDepthEvaluation> {
        debug!(thought_id = %thought.id, "DefaultThoughtProcessor::evaluate_depth: called");
        Ok(ThoughtDepthEvaluation {
            thought_id: thought.id.clone(),
            current_depth: thought.depth,
            max_possible_depth: self.config.max_thought_depth,
            depth_score: (thought.content.chars().count() % 100) as f64 / 100.0,
        })
    }
}
