//! Triaxis - Three-Axis Coordination Engine
//!
//! Triaxis runs analytic sessions across three independent axes (sequence,
//! composition and thought) under a bounded, deadline-aware coordinator.
//!
//! # Core Concepts
//!
//! - **Bounded Admission**: never more than the configured number of live sessions
//! - **Deadlines**: every session is cancelled once its timeout elapses
//! - **Bounded History**: retired sessions leave a record in a FIFO ring
//! - **Pluggable Collaborators**: every analytic concern sits behind an async trait
//!
//! # Modules
//!
//! - [`domain`] - Requests, sessions, records, balance and synergy types
//! - [`collaborators`] - Trait seams the coordinator delegates to
//! - [`processors`] - In-process reference collaborators
//! - [`coordinator`] - Admission, execution, history and lifecycle
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod processors;

// Re-export commonly used types
pub use collaborators::{
    BalanceOptimizer, CollabResult, CompositionProcessor, CoordinationEngine, SequenceProcessor, SynergyCatalyst,
    ThoughtProcessor,
};
pub use config::Config;
pub use coordinator::{
    CoordinatorBuilder, CoordinatorConfig, CoordinatorStats, HistoryBuffer, SynergyMode, ThreeAxisCoordinator,
};
pub use domain::{
    Coordinate, CoordinationRecord, CoordinationRequest, CoordinationResponse, CoordinationSession,
    CoordinationStatus, SessionStatus, SynergyOpportunity, SynergyResult,
};
pub use error::{CollaboratorError, CoordinatorError, ErrorKind, Result};
pub use processors::{
    CompositionConfig, DefaultCompositionProcessor, DefaultSequenceProcessor, DefaultThoughtProcessor,
    LocalCoordinationEngine, SequenceConfig, ThoughtConfig,
};
