//! Coordination session domain types
//!
//! A session is one admitted request to run all three axes together. The
//! coordinator owns a session while it is active; once retired it survives only
//! as a `CoordinationRecord` in history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::axis::{
    CompositionElement, CompositionRequest, CompositionResult, SequenceRequest, SequenceResult, ThoughtRequest,
    ThoughtResult, quality_score,
};
use super::id::generate_id;

/// Default session type for full three-axis coordination
pub const THREE_AXIS_SESSION: &str = "three_axis";

/// Caller input for a three-axis coordination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationRequest {
    pub request_id: String,
    pub entity_id: String,
    pub session_type: String,
    #[serde(default)]
    pub thought_content: String,
    #[serde(default)]
    pub target_depth: usize,
    #[serde(default)]
    pub composition_elements: Vec<CompositionElement>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

impl CoordinationRequest {
    /// Create a request for an entity with a generated request ID
    pub fn new(entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        Self {
            request_id: generate_id("request", &entity_id),
            entity_id,
            session_type: THREE_AXIS_SESSION.to_string(),
            thought_content: String::new(),
            target_depth: 0,
            composition_elements: Vec::new(),
            requirements: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_thought(mut self, content: impl Into<String>, target_depth: usize) -> Self {
        self.thought_content = content.into();
        self.target_depth = target_depth;
        self
    }

    pub fn with_elements(mut self, elements: Vec<CompositionElement>) -> Self {
        self.composition_elements = elements;
        self
    }

    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn sequence_request(&self) -> SequenceRequest {
        SequenceRequest {
            request_id: self.request_id.clone(),
            entity_id: self.entity_id.clone(),
            target_level: None,
            context: self.context.clone(),
        }
    }

    pub fn composition_request(&self) -> CompositionRequest {
        CompositionRequest {
            request_id: self.request_id.clone(),
            entity_id: self.entity_id.clone(),
            elements: self.composition_elements.clone(),
        }
    }

    pub fn thought_request(&self) -> ThoughtRequest {
        ThoughtRequest {
            request_id: self.request_id.clone(),
            entity_id: self.entity_id.clone(),
            thought_content: self.thought_content.clone(),
            target_depth: self.target_depth,
            requirements: self.requirements.clone(),
            context: self.context.clone(),
        }
    }
}

/// Lifecycle of a coordination session
///
/// `Initializing -> Processing -> (Completed | Failed | Timeout)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Initializing,
    Processing,
    Completed,
    Failed,
    Timeout,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Timeout)
    }

    /// Whether moving from `self` to `next` is a forward step
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        match self {
            Self::Initializing => next == Self::Processing,
            Self::Processing => next.is_terminal(),
            Self::Completed | Self::Failed | Self::Timeout => false,
        }
    }

    /// Outcome tag written into history records
    pub fn outcome_tag(&self) -> &'static str {
        match self {
            Self::Initializing => "coordination_initializing",
            Self::Processing => "coordination_processing",
            Self::Completed => "coordination_completed",
            Self::Failed => "coordination_failed",
            Self::Timeout => "coordination_timeout",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// One admitted, in-flight coordination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationSession {
    pub id: String,
    pub entity_id: String,
    pub session_type: String,
    pub request: CoordinationRequest,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub sequence: Option<SequenceResult>,
    pub composition: Option<CompositionResult>,
    pub thought: Option<ThoughtResult>,
}

impl CoordinationSession {
    /// Create a fresh session for a request with a generated ID
    pub fn new(request: CoordinationRequest) -> Self {
        let id = generate_id("session", &request.entity_id);
        Self::with_id(id, request)
    }

    /// Create with a specific ID (for testing or external engines)
    pub fn with_id(id: impl Into<String>, request: CoordinationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            entity_id: request.entity_id.clone(),
            session_type: request.session_type.clone(),
            request,
            status: SessionStatus::Initializing,
            started_at: now,
            last_activity: now,
            sequence: None,
            composition: None,
            thought: None,
        }
    }

    /// Advance the status; returns false and leaves the session untouched on a backward step
    pub fn advance(&mut self, next: SessionStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.touch();
        true
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Copy axis results from a response into the session
    pub fn absorb(&mut self, response: &CoordinationResponse) {
        self.sequence = response.sequence.clone();
        self.composition = response.composition.clone();
        self.thought = response.thought.clone();
        self.touch();
    }
}

/// Output of a completed coordination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinationResponse {
    pub request_id: String,
    pub session_id: String,
    pub sequence: Option<SequenceResult>,
    pub composition: Option<CompositionResult>,
    pub thought: Option<ThoughtResult>,
    pub process_time_ms: u64,
}

impl CoordinationResponse {
    /// Aggregate quality, present only when all three axes produced a result
    pub fn quality(&self) -> Option<f64> {
        match (&self.sequence, &self.composition, &self.thought) {
            (Some(s), Some(c), Some(t)) => Some(quality_score(s, c, t)),
            _ => None,
        }
    }
}

/// Progress report for a session, as seen by the coordination engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationStatus {
    pub session_id: String,
    pub phase: String,
    pub progress: f64,
    pub current_step: String,
    pub completed_steps: Vec<String>,
    pub pending_steps: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// One scored aspect of a quality evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDimension {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
}

/// Quality assessment of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityEvaluation {
    pub session_id: String,
    pub overall_score: f64,
    pub dimensions: Vec<QualityDimension>,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_forward_transitions() {
        assert!(SessionStatus::Initializing.can_transition_to(SessionStatus::Processing));
        assert!(SessionStatus::Processing.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Processing.can_transition_to(SessionStatus::Failed));
        assert!(SessionStatus::Processing.can_transition_to(SessionStatus::Timeout));
    }

    #[test]
    fn test_status_rejects_backward_and_skips() {
        assert!(!SessionStatus::Initializing.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::Processing.can_transition_to(SessionStatus::Initializing));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Processing));
        assert!(!SessionStatus::Timeout.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::Failed.can_transition_to(SessionStatus::Failed));
    }

    #[test]
    fn test_session_advance() {
        let mut session = CoordinationSession::new(CoordinationRequest::new("E1"));
        assert_eq!(session.status, SessionStatus::Initializing);
        assert!(session.id.starts_with("session-e1-"));

        assert!(session.advance(SessionStatus::Processing));
        assert!(session.advance(SessionStatus::Completed));
        assert!(!session.advance(SessionStatus::Processing));
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(SessionStatus::Timeout.to_string(), "timeout");
        let json = serde_json::to_string(&SessionStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_response_quality_requires_all_axes() {
        let mut response = CoordinationResponse {
            sequence: Some(SequenceResult {
                level: 3,
                ..Default::default()
            }),
            composition: Some(CompositionResult {
                layer: "C3".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(response.quality(), None);

        response.thought = Some(ThoughtResult {
            depth: 0.0,
            ..Default::default()
        });
        assert_eq!(response.quality(), Some(2.0));
    }

    #[test]
    fn test_request_builds_axis_requests() {
        let request = CoordinationRequest::new("E1")
            .with_thought("what is balance", 2)
            .with_elements(vec![CompositionElement::new("core", "module", 0.4)])
            .with_context_value("domain", "ethics");

        assert_eq!(request.session_type, THREE_AXIS_SESSION);
        assert_eq!(request.sequence_request().entity_id, "E1");
        assert_eq!(request.composition_request().elements.len(), 1);

        let thought = request.thought_request();
        assert_eq!(thought.target_depth, 2);
        assert_eq!(thought.context["domain"], "ethics");
    }
}
