//! Reference composition (C) axis processor

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::collaborators::{CollabResult, CompositionProcessor};
use crate::domain::{CompositionAnalysis, CompositionElement, CompositionRequest, CompositionResult};
use crate::error::CollaboratorError;

/// Layer every composition currently resolves to
pub const DEFAULT_COMPOSITION_LEVEL: u32 = 3;

/// Composition processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    #[serde(rename = "max-composition-complexity")]
    pub max_composition_complexity: f64,

    #[serde(rename = "max-element-count")]
    pub max_element_count: usize,

    #[serde(rename = "integrity-threshold")]
    pub integrity_threshold: f64,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            max_composition_complexity: 10.0,
            max_element_count: 100,
            integrity_threshold: 0.8,
        }
    }
}

pub struct DefaultCompositionProcessor {
    config: CompositionConfig,
}

impl DefaultCompositionProcessor {
    pub fn new(config: CompositionConfig) -> Self {
        debug!(?config, "DefaultCompositionProcessor::new: called");
        Self { config }
    }

    fn analyze(elements: &[CompositionElement]) -> CompositionAnalysis {
        let mut element_types = BTreeMap::new();
        for element in elements {
            *element_types.entry(element.kind.clone()).or_insert(0) += 1;
        }

        let count = elements.len();
        let (average_complexity, diversity) = if count == 0 {
            (0.0, 0.0)
        } else {
            let total: f64 = elements.iter().map(|e| e.complexity).sum();
            let distinct: BTreeSet<&str> = elements.iter().map(|e| e.kind.as_str()).collect();
            (total / count as f64, distinct.len() as f64 / count as f64)
        };

        CompositionAnalysis {
            element_count: count,
            element_types,
            average_complexity,
            diversity,
            coherence: 0.7 + (count as f64 / 10.0) / 50.0,
        }
    }

    /// Composition level for an analysis
    ///
    /// Always `DEFAULT_COMPOSITION_LEVEL`; the analysis does not move it yet.
    fn level(_analysis: &CompositionAnalysis) -> u32 {
        DEFAULT_COMPOSITION_LEVEL
    }

    fn layer_name(level: u32) -> String {
        format!("C{}", level)
    }

    fn validate(&self, elements: &[CompositionElement]) -> CollabResult<()> {
        if elements.len() > self.config.max_element_count {
            return Err(CollaboratorError::InvalidInput(format!(
                "{} elements exceeds maximum of {}",
                elements.len(),
                self.config.max_element_count
            )));
        }
        if let Some(element) = elements
            .iter()
            .find(|e| e.complexity < 0.0 || e.complexity > self.config.max_composition_complexity)
        {
            return Err(CollaboratorError::InvalidInput(format!(
                "element {} complexity {} out of range",
                element.name, element.complexity
            )));
        }
        Ok(())
    }
}

impl Default for DefaultCompositionProcessor {
    fn default() -> Self {
        Self::new(CompositionConfig::default())
    }
}

#[async_trait]
impl CompositionProcessor for DefaultCompositionProcessor {
    async fn process(&self, request: CompositionRequest) -> CollabResult<CompositionResult> {
        debug!(entity_id = %request.entity_id, elements = request.elements.len(), "DefaultCompositionProcessor::process: called");
        self.validate(&request.elements)?;

        let analysis = Self::analyze(&request.elements);
        let level = Self::level(&analysis);

        let architecture: BTreeMap<String, Value> = BTreeMap::from([
            ("elements".to_string(), json!(request.elements.len())),
            ("analysis".to_string(), json!(analysis)),
            ("architecture".to_string(), json!("default")),
        ]);

        Ok(CompositionResult {
            layer: Self::layer_name(level),
            components: request.elements.iter().map(|e| e.name.clone()).collect(),
            architecture,
            scalability: request.elements.len() as f64 * 0.1,
            process_time_ms: 0,
        })
    }

    async fn analyze_elements(&self, elements: &[CompositionElement]) -> CollabResult<CompositionAnalysis> {
        debug!(elements = elements.len(), "DefaultCompositionProcessor::analyze_elements: called");
        self.validate(elements)?;
        Ok(Self::analyze(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer_ordinal;

    fn elements() -> Vec<CompositionElement> {
        vec![
            CompositionElement::new("core", "module", 2.0),
            CompositionElement::new("edge", "module", 4.0),
            CompositionElement::new("bus", "channel", 3.0),
        ]
    }

    #[tokio::test]
    async fn test_process_constant_layer() {
        let processor = DefaultCompositionProcessor::default();
        let request = CompositionRequest {
            request_id: "r1".to_string(),
            entity_id: "E1".to_string(),
            elements: elements(),
        };

        let result = processor.process(request).await.unwrap();
        assert_eq!(result.layer, "C3");
        assert_eq!(layer_ordinal(&result.layer), 3.0);
        assert_eq!(result.components, vec!["core", "edge", "bus"]);
        assert!((result.scalability - 0.3).abs() < 1e-9);
        assert_eq!(result.architecture["elements"], 3);
    }

    #[tokio::test]
    async fn test_process_empty_elements() {
        let processor = DefaultCompositionProcessor::default();
        let result = processor.process(CompositionRequest::default()).await.unwrap();
        assert_eq!(result.layer, "C3");
        assert_eq!(result.scalability, 0.0);
        assert!(result.components.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_elements() {
        let processor = DefaultCompositionProcessor::default();
        let analysis = processor.analyze_elements(&elements()).await.unwrap();

        assert_eq!(analysis.element_count, 3);
        assert_eq!(analysis.element_types["module"], 2);
        assert_eq!(analysis.element_types["channel"], 1);
        assert!((analysis.average_complexity - 3.0).abs() < 1e-9);
        assert!((analysis.diversity - 2.0 / 3.0).abs() < 1e-9);
        assert!((analysis.coherence - 0.706).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_empty() {
        let processor = DefaultCompositionProcessor::default();
        let analysis = processor.analyze_elements(&[]).await.unwrap();
        assert_eq!(analysis.average_complexity, 0.0);
        assert_eq!(analysis.diversity, 0.0);
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_complexity() {
        let processor = DefaultCompositionProcessor::default();
        let bad = vec![CompositionElement::new("huge", "module", 50.0)];
        let err = processor.analyze_elements(&bad).await.unwrap_err();
        assert!(err.to_string().contains("huge"));
    }
}
