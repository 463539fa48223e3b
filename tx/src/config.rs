//! Triaxis configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::coordinator::{CoordinatorBuilder, CoordinatorConfig, ThreeAxisCoordinator};
use crate::processors::{
    CompositionConfig, DefaultCompositionProcessor, DefaultSequenceProcessor, DefaultThoughtProcessor,
    LocalCoordinationEngine, SequenceConfig, ThoughtConfig,
};

/// Main Triaxis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinator limits, thresholds and feature flags
    pub coordinator: CoordinatorConfig,

    /// Reference sequence processor settings
    pub sequence: SequenceConfig,

    /// Reference composition processor settings
    pub composition: CompositionConfig,

    /// Reference thought processor settings
    pub thought: ThoughtConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        self.coordinator.validate().context("Invalid coordinator configuration")?;

        if self.sequence.min_sequence_level > self.sequence.max_sequence_level {
            return Err(eyre::eyre!(
                "sequence.min-sequence-level ({}) exceeds max-sequence-level ({})",
                self.sequence.min_sequence_level,
                self.sequence.max_sequence_level
            ));
        }
        if self.composition.max_element_count == 0 {
            return Err(eyre::eyre!("composition.max-element-count must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.thought.depth_scale) {
            return Err(eyre::eyre!(
                "thought.depth-scale must be within 0.0..=1.0, got {}",
                self.thought.depth_scale
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .triaxis.yml
        let local_config = PathBuf::from(".triaxis.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/triaxis/triaxis.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("triaxis").join("triaxis.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Builder wired with the in-process reference collaborators
    ///
    /// Balance optimization and synergy catalysis have no reference
    /// implementation; attach them on the returned builder if needed.
    pub fn reference_builder(&self) -> CoordinatorBuilder {
        let sequence = Arc::new(DefaultSequenceProcessor::new(self.sequence.clone()));
        let composition = Arc::new(DefaultCompositionProcessor::new(self.composition.clone()));
        let thought = Arc::new(DefaultThoughtProcessor::new(self.thought.clone()));
        let engine = Arc::new(LocalCoordinationEngine::new(
            sequence.clone(),
            composition.clone(),
            thought.clone(),
        ));

        ThreeAxisCoordinator::builder(self.coordinator.clone())
            .engine(engine)
            .sequence_processor(sequence)
            .composition_processor(composition)
            .thought_processor(thought)
    }
}
