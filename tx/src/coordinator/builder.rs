//! Builder for `ThreeAxisCoordinator`

use std::sync::Arc;
use tracing::debug;

use crate::collaborators::{
    BalanceOptimizer, CompositionProcessor, CoordinationEngine, SequenceProcessor, SynergyCatalyst, ThoughtProcessor,
};
use crate::error::{CoordinatorError, Result};

use super::config::CoordinatorConfig;
use super::core::ThreeAxisCoordinator;

/// Synergy catalysis availability, resolved once at build time
#[derive(Clone)]
pub enum SynergyMode {
    Enabled(Arc<dyn SynergyCatalyst>),
    /// Turned off by `enable-synergy-catalysis: false`
    Disabled,
    /// Enabled but no catalyst was supplied
    NotConfigured,
}

impl SynergyMode {
    fn resolve(enabled: bool, catalyst: Option<Arc<dyn SynergyCatalyst>>) -> Self {
        match (enabled, catalyst) {
            (false, _) => Self::Disabled,
            (true, Some(catalyst)) => Self::Enabled(catalyst),
            (true, None) => Self::NotConfigured,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

impl std::fmt::Debug for SynergyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled(_) => write!(f, "Enabled"),
            Self::Disabled => write!(f, "Disabled"),
            Self::NotConfigured => write!(f, "NotConfigured"),
        }
    }
}

/// Collects collaborators; the coordination engine is mandatory
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
    engine: Option<Arc<dyn CoordinationEngine>>,
    sequence: Option<Arc<dyn SequenceProcessor>>,
    composition: Option<Arc<dyn CompositionProcessor>>,
    thought: Option<Arc<dyn ThoughtProcessor>>,
    balance: Option<Arc<dyn BalanceOptimizer>>,
    synergy: Option<Arc<dyn SynergyCatalyst>>,
}

impl CoordinatorBuilder {
    pub fn new(config: CoordinatorConfig) -> Self {
        debug!("CoordinatorBuilder::new: called");
        Self {
            config,
            engine: None,
            sequence: None,
            composition: None,
            thought: None,
            balance: None,
            synergy: None,
        }
    }

    pub fn engine(mut self, engine: Arc<dyn CoordinationEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn sequence_processor(mut self, processor: Arc<dyn SequenceProcessor>) -> Self {
        self.sequence = Some(processor);
        self
    }

    pub fn composition_processor(mut self, processor: Arc<dyn CompositionProcessor>) -> Self {
        self.composition = Some(processor);
        self
    }

    pub fn thought_processor(mut self, processor: Arc<dyn ThoughtProcessor>) -> Self {
        self.thought = Some(processor);
        self
    }

    pub fn balance_optimizer(mut self, optimizer: Arc<dyn BalanceOptimizer>) -> Self {
        self.balance = Some(optimizer);
        self
    }

    pub fn synergy_catalyst(mut self, catalyst: Arc<dyn SynergyCatalyst>) -> Self {
        self.synergy = Some(catalyst);
        self
    }

    /// Validate the config and assemble the coordinator
    pub fn build(self) -> Result<ThreeAxisCoordinator> {
        debug!("CoordinatorBuilder::build: called");
        self.config.validate()?;
        let engine = self
            .engine
            .ok_or_else(|| CoordinatorError::Configuration("coordination engine is required".to_string()))?;
        let synergy = SynergyMode::resolve(self.config.enable_synergy_catalysis, self.synergy);
        debug!(?synergy, "CoordinatorBuilder::build: synergy resolved");

        Ok(ThreeAxisCoordinator::from_parts(
            self.config,
            engine,
            self.sequence,
            self.composition,
            self.thought,
            self.balance,
            synergy,
        ))
    }
}
