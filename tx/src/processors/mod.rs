//! Reference collaborators
//!
//! Deterministic in-process implementations of the axis processors and the
//! coordination engine, used by the CLI and as stand-ins when no real
//! analytic backend is wired in.

mod composition;
mod engine;
mod sequence;
mod thought;

pub use composition::{CompositionConfig, DEFAULT_COMPOSITION_LEVEL, DefaultCompositionProcessor};
pub use engine::LocalCoordinationEngine;
pub use sequence::{DefaultSequenceProcessor, MAX_SEQUENCE_LEVEL, SequenceConfig};
pub use thought::{DefaultThoughtProcessor, ThoughtConfig};
