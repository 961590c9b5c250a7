use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::Question;

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub bank_size: usize,
}

impl SessionPlan {
    /// Number of questions selected for this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Samples a fixed-size session subset from a question bank.
///
/// Uses a uniform Fisher-Yates shuffle of the whole bank and takes a prefix,
/// so selection is without replacement and every subset is equally likely.
#[derive(Debug, Clone, Copy)]
pub struct SessionPlanner {
    count: u32,
}

impl SessionPlanner {
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    /// Sample with the thread-local generator.
    #[must_use]
    pub fn sample(&self, bank: Vec<Question>) -> SessionPlan {
        self.sample_with(bank, &mut rng())
    }

    /// Sample with a caller-provided generator, for deterministic tests.
    #[must_use]
    pub fn sample_with<R: Rng>(&self, mut bank: Vec<Question>, rng: &mut R) -> SessionPlan {
        let bank_size = bank.len();
        bank.as_mut_slice().shuffle(rng);

        let take = usize::try_from(self.count).unwrap_or(usize::MAX);
        bank.truncate(take);

        SessionPlan {
            questions: bank,
            bank_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::{AnswerPayload, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            AnswerPayload::TrueFalse { answer: true },
            30,
        )
        .unwrap()
    }

    fn build_bank(size: u64) -> Vec<Question> {
        (1..=size).map(build_question).collect()
    }

    #[test]
    fn samples_requested_subset_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = SessionPlanner::new(10).sample_with(build_bank(20), &mut rng);
        assert_eq!(plan.total(), 10);
        assert_eq!(plan.bank_size, 20);
    }

    #[test]
    fn never_selects_duplicates() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = SessionPlanner::new(10).sample_with(build_bank(30), &mut rng);
            let ids: HashSet<_> = plan.questions.iter().map(Question::id).collect();
            assert_eq!(ids.len(), plan.total());
        }
    }

    #[test]
    fn small_bank_is_taken_whole() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = SessionPlanner::new(10).sample_with(build_bank(4), &mut rng);
        assert_eq!(plan.total(), 4);

        let ids: HashSet<_> = plan.questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, HashSet::from([1, 2, 3, 4]));
    }
}
