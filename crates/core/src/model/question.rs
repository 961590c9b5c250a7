use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,
    #[error("question time budget must be positive")]
    ZeroTimeBudget,
    #[error("multiple choice needs at least 2 choices, got {0}")]
    TooFewChoices(usize),
    #[error("correct choice index {index} out of range for {choices} choices")]
    CorrectOutOfRange { index: usize, choices: usize },
    #[error("matching question needs at least one pair")]
    NoPairs,
    #[error("fill question needs at least one accepted answer")]
    NoAcceptedAnswers,
    #[error("reorder question needs at least 2 items, got {0}")]
    TooFewItems(usize),
}

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

/// The five gameplay question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice,
    Matching,
    #[serde(rename = "fill")]
    FillBlank,
    Reorder,
    #[serde(rename = "truefalse")]
    TrueFalse,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::MultipleChoice => "mcq",
            QuestionKind::Matching => "matching",
            QuestionKind::FillBlank => "fill",
            QuestionKind::Reorder => "reorder",
            QuestionKind::TrueFalse => "truefalse",
        };
        write!(f, "{name}")
    }
}

//
// ─── ANSWER PAYLOAD ───────────────────────────────────────────────────────────
//

/// Per-kind answer data for a question.
///
/// The wire shape is internally tagged by `type`, matching the question API's
/// record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerPayload {
    #[serde(rename = "mcq")]
    MultipleChoice {
        choices: Vec<String>,
        correct: usize,
    },
    Matching {
        pairs: Vec<(String, String)>,
    },
    #[serde(rename = "fill")]
    FillBlank {
        accepted: Vec<String>,
    },
    Reorder {
        items: Vec<String>,
    },
    #[serde(rename = "truefalse")]
    TrueFalse {
        answer: bool,
    },
}

impl AnswerPayload {
    /// The question kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerPayload::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            AnswerPayload::Matching { .. } => QuestionKind::Matching,
            AnswerPayload::FillBlank { .. } => QuestionKind::FillBlank,
            AnswerPayload::Reorder { .. } => QuestionKind::Reorder,
            AnswerPayload::TrueFalse { .. } => QuestionKind::TrueFalse,
        }
    }

    fn validate(&self) -> Result<(), QuestionError> {
        match self {
            AnswerPayload::MultipleChoice { choices, correct } => {
                if choices.len() < 2 {
                    return Err(QuestionError::TooFewChoices(choices.len()));
                }
                if *correct >= choices.len() {
                    return Err(QuestionError::CorrectOutOfRange {
                        index: *correct,
                        choices: choices.len(),
                    });
                }
                Ok(())
            }
            AnswerPayload::Matching { pairs } => {
                if pairs.is_empty() {
                    return Err(QuestionError::NoPairs);
                }
                Ok(())
            }
            AnswerPayload::FillBlank { accepted } => {
                if accepted.is_empty() {
                    return Err(QuestionError::NoAcceptedAnswers);
                }
                Ok(())
            }
            AnswerPayload::Reorder { items } => {
                if items.len() < 2 {
                    return Err(QuestionError::TooFewItems(items.len()));
                }
                Ok(())
            }
            AnswerPayload::TrueFalse { .. } => Ok(()),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single playable question, immutable once fetched for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    payload: AnswerPayload,
    time_budget_secs: u32,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, the time budget is
    /// zero, or the payload is malformed for its kind.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        payload: AnswerPayload,
        time_budget_secs: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if time_budget_secs == 0 {
            return Err(QuestionError::ZeroTimeBudget);
        }
        payload.validate()?;

        Ok(Self {
            id,
            prompt,
            payload,
            time_budget_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.payload.kind()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn payload(&self) -> &AnswerPayload {
        &self.payload
    }

    /// Seconds this question contributes to the level countdown.
    #[must_use]
    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq_payload() -> AnswerPayload {
        AnswerPayload::MultipleChoice {
            choices: vec!["Paris".into(), "Lyon".into(), "Nice".into()],
            correct: 0,
        }
    }

    #[test]
    fn builds_valid_question() {
        let question = Question::new(
            QuestionId::new(1),
            "Capital of France?",
            mcq_payload(),
            30,
        )
        .unwrap();
        assert_eq!(question.kind(), QuestionKind::MultipleChoice);
        assert_eq!(question.time_budget_secs(), 30);
    }

    #[test]
    fn rejects_empty_prompt() {
        let err = Question::new(QuestionId::new(1), "  ", mcq_payload(), 30).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_zero_budget() {
        let err = Question::new(QuestionId::new(1), "Q", mcq_payload(), 0).unwrap_err();
        assert_eq!(err, QuestionError::ZeroTimeBudget);
    }

    #[test]
    fn rejects_correct_index_out_of_range() {
        let payload = AnswerPayload::MultipleChoice {
            choices: vec!["a".into(), "b".into()],
            correct: 2,
        };
        let err = Question::new(QuestionId::new(1), "Q", payload, 30).unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOutOfRange { .. }));
    }

    #[test]
    fn rejects_single_choice() {
        let payload = AnswerPayload::MultipleChoice {
            choices: vec!["a".into()],
            correct: 0,
        };
        let err = Question::new(QuestionId::new(1), "Q", payload, 30).unwrap_err();
        assert_eq!(err, QuestionError::TooFewChoices(1));
    }

    #[test]
    fn rejects_empty_reorder() {
        let payload = AnswerPayload::Reorder {
            items: vec!["one".into()],
        };
        let err = Question::new(QuestionId::new(1), "Q", payload, 30).unwrap_err();
        assert_eq!(err, QuestionError::TooFewItems(1));
    }

    #[test]
    fn payload_wire_shape_is_type_tagged() {
        let json = r#"{"type":"truefalse","answer":true}"#;
        let payload: AnswerPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload, AnswerPayload::TrueFalse { answer: true });
        assert_eq!(payload.kind(), QuestionKind::TrueFalse);
    }
}
