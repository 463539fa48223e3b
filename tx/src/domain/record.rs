//! History records
//!
//! A `CoordinationRecord` is the immutable trace a retired session leaves in
//! the coordinator's history buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::id::generate_id;
use super::session::{CoordinationSession, SessionStatus};

/// One retired coordination session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationRecord {
    pub record_id: String,
    pub timestamp: DateTime<Utc>,
    /// Entity the session ran for
    pub actor: String,
    /// Session type
    pub action: String,
    /// Session ID
    pub target: String,
    pub details: BTreeMap<String, Value>,
    /// Ordered outcome tags
    pub results: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
}

impl CoordinationRecord {
    /// Start a record for a session that reached `status`
    pub fn for_session(session: &CoordinationSession, status: SessionStatus) -> Self {
        Self {
            record_id: generate_id("record", &session.entity_id),
            timestamp: Utc::now(),
            actor: session.entity_id.clone(),
            action: session.session_type.clone(),
            target: session.id.clone(),
            details: BTreeMap::new(),
            results: vec![status.outcome_tag().to_string()],
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Error text recorded for a failed or timed out session
    pub fn error(&self) -> Option<&str> {
        self.metadata.get("error").and_then(Value::as_str)
    }
}
