use crate::state::QuestionId;

/// All errors the triage engine can return.
///
/// Every error leaves the `TriageState` unchanged: an answer that is
/// rejected is never partially recorded, and `next_step` never advances
/// state at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    /// A numeric answer was negative. FIT results and ages are
    /// non-negative integers; routing never sees a negative value.
    #[error("negative value {value} for question '{question}'")]
    NegativeValue { question: QuestionId, value: i64 },

    /// A numeric answer exceeded the representable range.
    #[error("value {value} out of range for question '{question}'")]
    ValueOutOfRange { question: QuestionId, value: i64 },

    /// The answer variant does not match the question's answer kind
    /// (e.g. a yes/no answer offered for a numeric question, or the
    /// "unavailable" marker offered for anything but the FIT result).
    #[error("question '{question}' expects a {expected} answer")]
    WrongAnswerKind {
        question: QuestionId,
        expected: &'static str,
    },

    /// An answer was recorded for a question that is not the current
    /// prompt. Each question is answered once, in the order the engine
    /// asks it.
    #[error("expected answer for question '{expected}', got '{got}'")]
    OutOfOrder {
        expected: QuestionId,
        got: QuestionId,
    },

    /// An answer was recorded after the encounter reached a terminal
    /// recommendation.
    #[error("encounter already reached a terminal recommendation")]
    EncounterComplete,

    /// The state carries an answer for a question that is unreachable
    /// given the earlier answers (e.g. a FIT value with no FIT test
    /// performed). Rejected rather than inferring a route.
    #[error("inconsistent state: answer for unreachable question '{question}'")]
    InconsistentState { question: QuestionId },
}
