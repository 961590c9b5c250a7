use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quiz_core::{Level, Question, Subject};

use super::{ApiError, LeaderboardApi, ProgressApi, ProgressUpdate, QuestionApi, ScoreSubmission};

/// Simple in-memory API implementation for testing and prototyping.
///
/// Banks are scripted per (subject, level); submissions are recorded for
/// inspection. Submission failure can be injected to exercise the
/// log-and-swallow delivery policy.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    banks: Arc<Mutex<HashMap<(Subject, Level), Vec<Question>>>>,
    scores: Arc<Mutex<Vec<ScoreSubmission>>>,
    progress: Arc<Mutex<Vec<ProgressUpdate>>>,
    fail_submissions: Arc<AtomicBool>,
    fetch_count: Arc<AtomicUsize>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the question bank returned for a subject and level.
    pub fn insert_bank(&self, subject: Subject, level: Level, questions: Vec<Question>) {
        if let Ok(mut guard) = self.banks.lock() {
            guard.insert((subject, level), questions);
        }
    }

    /// Make all subsequent submissions fail.
    pub fn fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Number of bank fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn submitted_scores(&self) -> Vec<ScoreSubmission> {
        self.scores.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn submitted_progress(&self) -> Vec<ProgressUpdate> {
        self.progress
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionApi for InMemoryApi {
    async fn fetch_questions(
        &self,
        subject: &Subject,
        level: Level,
    ) -> Result<Vec<Question>, ApiError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let guard = self
            .banks
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard
            .get(&(subject.clone(), level))
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl LeaderboardApi for InMemoryApi {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<(), ApiError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("injected failure".into()));
        }
        let mut guard = self
            .scores
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard.push(submission.clone());
        Ok(())
    }
}

#[async_trait]
impl ProgressApi for InMemoryApi {
    async fn submit_progress(&self, update: &ProgressUpdate) -> Result<(), ApiError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("injected failure".into()));
        }
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard.push(update.clone());
        Ok(())
    }
}
