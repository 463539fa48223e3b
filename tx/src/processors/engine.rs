//! In-process coordination engine
//!
//! Runs the three axis processors concurrently for each session and tracks
//! per-session progress so the coordinator's background loop can monitor it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::collaborators::{CollabResult, CompositionProcessor, CoordinationEngine, SequenceProcessor, ThoughtProcessor};
use crate::domain::{
    CoordinationRequest, CoordinationResponse, CoordinationSession, CoordinationStatus, QualityDimension,
    QualityEvaluation, layer_ordinal, quality_score,
};
use crate::error::CollaboratorError;

use super::{DefaultCompositionProcessor, DefaultSequenceProcessor, DefaultThoughtProcessor};

const STEPS: [&str; 3] = ["sequence", "composition", "thought"];

/// Progress of one session inside the engine
#[derive(Debug, Clone)]
struct SessionProgress {
    phase: &'static str,
    completed: Vec<&'static str>,
    cancel: CancellationToken,
    last_updated: DateTime<Utc>,
}

impl SessionProgress {
    fn new() -> Self {
        Self {
            phase: "initializing",
            completed: Vec::new(),
            cancel: CancellationToken::new(),
            last_updated: Utc::now(),
        }
    }

    fn status(&self, session_id: &str) -> CoordinationStatus {
        let pending: Vec<String> = STEPS
            .iter()
            .filter(|step| !self.completed.contains(step))
            .map(|step| step.to_string())
            .collect();
        CoordinationStatus {
            session_id: session_id.to_string(),
            phase: self.phase.to_string(),
            progress: self.completed.len() as f64 / STEPS.len() as f64,
            current_step: pending.first().cloned().unwrap_or_else(|| "done".to_string()),
            completed_steps: self.completed.iter().map(|s| s.to_string()).collect(),
            pending_steps: pending,
            last_updated: self.last_updated,
        }
    }
}

/// Removes a session's progress entry when execution ends or is aborted
struct ProgressGuard<'a> {
    sessions: &'a RwLock<HashMap<String, SessionProgress>>,
    session_id: String,
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(&self.session_id);
        }
    }
}

/// Coordination engine backed by in-process axis processors
pub struct LocalCoordinationEngine {
    sequence: Arc<dyn SequenceProcessor>,
    composition: Arc<dyn CompositionProcessor>,
    thought: Arc<dyn ThoughtProcessor>,
    sessions: RwLock<HashMap<String, SessionProgress>>,
}

impl LocalCoordinationEngine {
    pub fn new(
        sequence: Arc<dyn SequenceProcessor>,
        composition: Arc<dyn CompositionProcessor>,
        thought: Arc<dyn ThoughtProcessor>,
    ) -> Self {
        debug!("LocalCoordinationEngine::new: called");
        Self {
            sequence,
            composition,
            thought,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of sessions the engine is currently tracking
    pub fn tracked_sessions(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    fn update(&self, session_id: &str, f: impl FnOnce(&mut SessionProgress)) {
        if let Ok(mut sessions) = self.sessions.write()
            && let Some(progress) = sessions.get_mut(session_id)
        {
            f(progress);
            progress.last_updated = Utc::now();
        } else {
            debug!(%session_id, "LocalCoordinationEngine::update: session not tracked or lock failed");
        }
    }

    async fn step<T>(
        &self,
        session_id: &str,
        step: &'static str,
        work: impl Future<Output = CollabResult<T>>,
    ) -> CollabResult<T> {
        let output = work.await?;
        debug!(%session_id, %step, "LocalCoordinationEngine::step: completed");
        self.update(session_id, |progress| progress.completed.push(step));
        Ok(output)
    }
}

impl Default for LocalCoordinationEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultSequenceProcessor::default()),
            Arc::new(DefaultCompositionProcessor::default()),
            Arc::new(DefaultThoughtProcessor::default()),
        )
    }
}

#[async_trait]
impl CoordinationEngine for LocalCoordinationEngine {
    async fn initiate(&self, request: &CoordinationRequest) -> CollabResult<CoordinationSession> {
        debug!(entity_id = %request.entity_id, "LocalCoordinationEngine::initiate: called");
        if request.entity_id.trim().is_empty() {
            return Err(CollaboratorError::InvalidInput("entity_id is empty".to_string()));
        }

        let session = CoordinationSession::new(request.clone());
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| CollaboratorError::failed("session table lock poisoned"))?;
        sessions.insert(session.id.clone(), SessionProgress::new());
        debug!(session_id = %session.id, "LocalCoordinationEngine::initiate: session tracked");
        Ok(session)
    }

    async fn execute(&self, session: CoordinationSession, cancel: CancellationToken) -> CollabResult<CoordinationResponse> {
        debug!(session_id = %session.id, "LocalCoordinationEngine::execute: called");
        let local_cancel = self
            .sessions
            .read()
            .ok()
            .and_then(|s| s.get(&session.id).map(|p| p.cancel.clone()))
            .ok_or_else(|| CollaboratorError::SessionNotFound(session.id.clone()))?;
        let _guard = ProgressGuard {
            sessions: &self.sessions,
            session_id: session.id.clone(),
        };
        self.update(&session.id, |progress| progress.phase = "processing");

        let started = Instant::now();
        let request = &session.request;
        let work = async {
            tokio::try_join!(
                self.step(&session.id, "sequence", self.sequence.process(request.sequence_request())),
                self.step(&session.id, "composition", self.composition.process(request.composition_request())),
                self.step(&session.id, "thought", self.thought.process(request.thought_request()))
            )
        };

        let (sequence, composition, thought) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(session_id = %session.id, "LocalCoordinationEngine::execute: cancelled by caller");
                return Err(CollaboratorError::Cancelled);
            }
            _ = local_cancel.cancelled() => {
                debug!(session_id = %session.id, "LocalCoordinationEngine::execute: terminated");
                return Err(CollaboratorError::Cancelled);
            }
            result = work => result?,
        };

        Ok(CoordinationResponse {
            request_id: request.request_id.clone(),
            session_id: session.id.clone(),
            sequence: Some(sequence),
            composition: Some(composition),
            thought: Some(thought),
            process_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn monitor(&self, session_id: &str) -> CollabResult<CoordinationStatus> {
        debug!(%session_id, "LocalCoordinationEngine::monitor: called");
        self.sessions
            .read()
            .ok()
            .and_then(|s| s.get(session_id).map(|p| p.status(session_id)))
            .ok_or_else(|| CollaboratorError::SessionNotFound(session_id.to_string()))
    }

    async fn terminate(&self, session_id: &str) -> CollabResult<()> {
        debug!(%session_id, "LocalCoordinationEngine::terminate: called");
        let progress = self.sessions.write().ok().and_then(|mut s| s.remove(session_id));
        match progress {
            Some(progress) => {
                progress.cancel.cancel();
                Ok(())
            }
            None => {
                warn!(%session_id, "LocalCoordinationEngine::terminate: session not tracked");
                Err(CollaboratorError::SessionNotFound(session_id.to_string()))
            }
        }
    }

    async fn evaluate_quality(&self, session: &CoordinationSession) -> CollabResult<QualityEvaluation> {
        debug!(session_id = %session.id, "LocalCoordinationEngine::evaluate_quality: called");
        let (Some(sequence), Some(composition), Some(thought)) = (&session.sequence, &session.composition, &session.thought)
        else {
            return Err(CollaboratorError::InvalidInput(format!(
                "session {} has incomplete axis results",
                session.id
            )));
        };

        let weight = 1.0 / 3.0;
        Ok(QualityEvaluation {
            session_id: session.id.clone(),
            overall_score: quality_score(sequence, composition, thought),
            dimensions: vec![
                QualityDimension {
                    name: "sequence".to_string(),
                    score: f64::from(sequence.level),
                    max_score: 9.0,
                    weight,
                },
                QualityDimension {
                    name: "composition".to_string(),
                    score: layer_ordinal(&composition.layer),
                    max_score: 5.0,
                    weight,
                },
                QualityDimension {
                    name: "thought".to_string(),
                    score: thought.depth,
                    max_score: 1.0,
                    weight,
                },
            ],
            evaluated_at: Utc::now(),
        })
    }
}
