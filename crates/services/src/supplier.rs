use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use quiz_core::{Clock, Level, Question, Subject};

use crate::api::{ApiError, QuestionApi};
use crate::error::SupplierError;

/// Default window during which a fetched bank is reused on re-entry.
const DEFAULT_CACHE_TTL_SECS: i64 = 60;

struct CachedBank {
    fetched_at: DateTime<Utc>,
    questions: Vec<Question>,
}

/// Fetches and caches question banks per (subject, level).
///
/// Fetched banks are deduplicated by question id (first occurrence wins,
/// order preserved) and cached for a bounded time window so rapid re-entry
/// into a level does not refetch.
pub struct QuestionSupplier {
    api: Arc<dyn QuestionApi>,
    clock: Clock,
    ttl: Duration,
    cache: Mutex<HashMap<(Subject, Level), CachedBank>>,
}

impl QuestionSupplier {
    #[must_use]
    pub fn new(api: Arc<dyn QuestionApi>, clock: Clock) -> Self {
        Self {
            api,
            clock,
            ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Override the cache window. A zero TTL disables caching.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch the deduplicated question bank for a subject and level.
    ///
    /// # Errors
    ///
    /// Returns `SupplierError::NoQuestions` when the bank is missing or
    /// empty, or `SupplierError::Api` for transport failures.
    pub async fn questions(
        &self,
        subject: &Subject,
        level: Level,
    ) -> Result<Vec<Question>, SupplierError> {
        let key = (subject.clone(), level);
        let now = self.clock.now();

        if let Ok(guard) = self.cache.lock()
            && let Some(cached) = guard.get(&key)
            && now - cached.fetched_at < self.ttl
        {
            return Ok(cached.questions.clone());
        }

        let fetched = match self.api.fetch_questions(subject, level).await {
            Ok(bank) => bank,
            Err(ApiError::NotFound) => {
                return Err(SupplierError::NoQuestions {
                    subject: subject.clone(),
                    level,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let questions = dedupe_by_id(fetched);
        if questions.is_empty() {
            return Err(SupplierError::NoQuestions {
                subject: subject.clone(),
                level,
            });
        }

        if let Ok(mut guard) = self.cache.lock() {
            guard.insert(
                key,
                CachedBank {
                    fetched_at: now,
                    questions: questions.clone(),
                },
            );
        }

        Ok(questions)
    }
}

fn dedupe_by_id(questions: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    questions
        .into_iter()
        .filter(|q| seen.insert(q.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryApi;
    use quiz_core::time::fixed_clock;
    use quiz_core::{AnswerPayload, QuestionId};

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            AnswerPayload::TrueFalse { answer: true },
            30,
        )
        .unwrap()
    }

    fn subject() -> Subject {
        Subject::new("geography").unwrap()
    }

    fn level() -> Level {
        Level::new(1).unwrap()
    }

    #[tokio::test]
    async fn missing_bank_surfaces_no_questions() {
        let api = Arc::new(InMemoryApi::new());
        let supplier = QuestionSupplier::new(api, fixed_clock());
        let err = supplier.questions(&subject(), level()).await.unwrap_err();
        assert!(matches!(err, SupplierError::NoQuestions { .. }));
    }

    #[tokio::test]
    async fn empty_bank_surfaces_no_questions() {
        let api = Arc::new(InMemoryApi::new());
        api.insert_bank(subject(), level(), Vec::new());
        let supplier = QuestionSupplier::new(api, fixed_clock());
        let err = supplier.questions(&subject(), level()).await.unwrap_err();
        assert!(matches!(err, SupplierError::NoQuestions { .. }));
    }

    #[tokio::test]
    async fn dedupes_by_id_preserving_order() {
        let api = Arc::new(InMemoryApi::new());
        api.insert_bank(
            subject(),
            level(),
            vec![question(1), question(2), question(1), question(3)],
        );
        let supplier = QuestionSupplier::new(api, fixed_clock());

        let bank = supplier.questions(&subject(), level()).await.unwrap();
        let ids: Vec<u64> = bank.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn serves_cached_bank_within_ttl() {
        let api = Arc::new(InMemoryApi::new());
        api.insert_bank(subject(), level(), vec![question(1)]);
        let supplier = QuestionSupplier::new(api.clone(), fixed_clock());

        supplier.questions(&subject(), level()).await.unwrap();
        supplier.questions(&subject(), level()).await.unwrap();
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let api = Arc::new(InMemoryApi::new());
        api.insert_bank(subject(), level(), vec![question(1)]);
        let supplier =
            QuestionSupplier::new(api.clone(), fixed_clock()).with_ttl(Duration::zero());

        supplier.questions(&subject(), level()).await.unwrap();
        supplier.questions(&subject(), level()).await.unwrap();
        assert_eq!(api.fetch_count(), 2);
    }
}
