//! In-memory session store.
//!
//! Each session pairs one learner profile with its working material (current
//! content, analysis, issued quiz), score history, chat history, and the
//! decision log. Mutations run under the store's write lock, so a partially
//! applied update is never visible to readers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::adaptive::{DecisionLog, DifficultyLevel, LearnerProfile};
use crate::model::{ContentAnalysis, QuizQuestion};

/// One question/answer exchange with the tutor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

/// One graded quiz submission.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScoreEntry {
    pub score: f64,
    pub correct: u32,
    pub total: u32,
    pub difficulty: DifficultyLevel,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub profile: LearnerProfile,
    pub current_content: String,
    pub analysis: Option<ContentAnalysis>,
    pub issued_quiz: Vec<QuizQuestion>,
    /// Difficulty the current quiz was issued at. Grading classifies against
    /// this, not the profile level, which may have moved since.
    pub issued_difficulty: DifficultyLevel,
    pub quiz_scores: Vec<QuizScoreEntry>,
    pub chat_history: Vec<ChatTurn>,
    pub decision_log: DecisionLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new(id: Uuid, native_language: String, decision_log: DecisionLog) -> Self {
        let now = Utc::now();
        Self {
            id,
            profile: LearnerProfile::new(native_language),
            current_content: String::new(),
            analysis: None,
            issued_quiz: Vec::new(),
            issued_difficulty: DifficultyLevel::default(),
            quiz_scores: Vec::new(),
            chat_history: Vec::new(),
            decision_log,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Shared handle to every live session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    log_capacity: usize,
}

impl SessionStore {
    /// `log_capacity` bounds each session's decision log; 0 keeps it unbounded.
    pub fn new(log_capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            log_capacity,
        }
    }

    fn new_log(&self) -> DecisionLog {
        if self.log_capacity == 0 {
            DecisionLog::new()
        } else {
            DecisionLog::bounded(self.log_capacity)
        }
    }

    pub async fn create(&self, native_language: String) -> Session {
        let id = Uuid::new_v4();
        let session = Session::new(id, native_language, self.new_log());
        self.sessions.write().await.insert(id, session.clone());
        session
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Run a read-only closure against one session. None if the id is unknown.
    pub async fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Option<T> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(f)
    }

    /// Run a mutating closure against one session under the write lock.
    /// `updated_at` is bumped after the closure returns.
    pub async fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        let out = f(session);
        session.updated_at = Utc::now();
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_read_back() {
        let store = SessionStore::new(0);
        let session = store.create("Hindi".to_string()).await;
        assert_eq!(store.count().await, 1);

        let language = store
            .with_session(session.id, |s| s.profile.native_language.clone())
            .await;
        assert_eq!(language.as_deref(), Some("Hindi"));
    }

    #[tokio::test]
    async fn mutation_bumps_updated_at() {
        let store = SessionStore::new(0);
        let session = store.create("Spanish".to_string()).await;
        let before = session.updated_at;

        store
            .with_session_mut(session.id, |s| {
                s.profile.add_topic("Photosynthesis");
            })
            .await;

        let after = store
            .with_session(session.id, |s| s.updated_at)
            .await
            .unwrap();
        assert!(after >= before);
    }

    #[tokio::test]
    async fn remove_is_idempotent_on_missing() {
        let store = SessionStore::new(0);
        let session = store.create("Tamil".to_string()).await;
        assert!(store.remove(session.id).await);
        assert!(!store.remove(session.id).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn unknown_session_yields_none() {
        let store = SessionStore::new(0);
        let got = store.with_session(Uuid::new_v4(), |s| s.id).await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn log_capacity_is_applied_per_session() {
        let store = SessionStore::new(2);
        let session = store.create("Bengali".to_string()).await;

        let seqs = store
            .with_session_mut(session.id, |s| {
                for i in 0..4 {
                    s.decision_log.record(
                        crate::adaptive::DecisionKind::StrategicPlanning,
                        format!("step {i}"),
                        "continue_learning",
                    );
                }
                (s.decision_log.len(), s.decision_log.last().map(|e| e.seq))
            })
            .await
            .unwrap();

        assert_eq!(seqs, (2, Some(4)));
    }
}
