//! Accumulated answers for one in-progress triage encounter.
//!
//! A `TriageState` starts empty, is mutated only by [`TriageState::record`],
//! and is never rewritten retroactively. The engine is a pure function of
//! this state: the same state always yields the same next prompt or
//! terminal recommendation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine;
use crate::error::TriageError;
use crate::step::Step;
use crate::symptom::{Symptom, SymptomSet};

/// Identifies one question in the engine's repertoire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    Symptoms,
    FitDone,
    FitValue,
    FerritinAvailable,
    FosSuitable,
    ReturnToReferrer,
    HighRisk,
    Age,
    RectalBleeding,
}

impl QuestionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionId::Symptoms => "symptoms",
            QuestionId::FitDone => "fit_done",
            QuestionId::FitValue => "fit_value",
            QuestionId::FerritinAvailable => "ferritin_available",
            QuestionId::FosSuitable => "fos_suitable",
            QuestionId::ReturnToReferrer => "return_to_referrer",
            QuestionId::HighRisk => "high_risk",
            QuestionId::Age => "age",
            QuestionId::RectalBleeding => "rectal_bleeding",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clinician response, as supplied by the host presentation layer.
///
/// Numeric answers arrive as `i64` so that out-of-range input reaches the
/// engine and is rejected there, rather than being silently clamped by the
/// host. `Unavailable` is legal only for the FIT result question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Symptoms(SymptomSet),
    Bool(bool),
    Count(i64),
    Unavailable,
}

/// A recorded FIT result: either a measured concentration or an explicit
/// "result unavailable" marker.
///
/// The marker exists so that an unavailable result is never represented as
/// zero -- a zero would silently satisfy the `< 100` comparison in the
/// FIT >=10 pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitResult {
    Measured(u32),
    Unavailable,
}

impl FitResult {
    /// The measured concentration, if one was recorded.
    pub fn measured(&self) -> Option<u32> {
        match self {
            FitResult::Measured(v) => Some(*v),
            FitResult::Unavailable => None,
        }
    }
}

/// The accumulated answers for one encounter.
///
/// Serde round-trips so a host can carry the state between screen renders
/// or HTTP requests. A deserialized state is re-validated on every
/// `next_step` call; answers for unreachable questions are rejected, never
/// reinterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageState {
    symptoms: Option<SymptomSet>,
    fit_done: Option<bool>,
    fit_result: Option<FitResult>,
    ferritin_available: Option<bool>,
    fos_suitable: Option<bool>,
    return_to_referrer: Option<bool>,
    high_risk: Option<bool>,
    age: Option<u32>,
    rectal_bleeding: Option<bool>,
}

impl TriageState {
    /// Start a fresh encounter with no answers recorded.
    pub fn new() -> Self {
        TriageState::default()
    }

    pub fn symptoms(&self) -> Option<&SymptomSet> {
        self.symptoms.as_ref()
    }

    pub fn fit_done(&self) -> Option<bool> {
        self.fit_done
    }

    pub fn fit_result(&self) -> Option<FitResult> {
        self.fit_result
    }

    pub fn ferritin_available(&self) -> Option<bool> {
        self.ferritin_available
    }

    pub fn fos_suitable(&self) -> Option<bool> {
        self.fos_suitable
    }

    pub fn return_to_referrer(&self) -> Option<bool> {
        self.return_to_referrer
    }

    pub fn high_risk(&self) -> Option<bool> {
        self.high_risk
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn rectal_bleeding(&self) -> Option<bool> {
        self.rectal_bleeding
    }

    /// Informational notes for the clinician, derived from the symptom set.
    ///
    /// Non-branching: these never alter routing, and they apply to the
    /// normal pathway only (the rectal/anal mass sub-pathway supersedes
    /// them).
    pub fn advisory_notes(&self) -> Vec<AdvisoryNote> {
        let Some(symptoms) = &self.symptoms else {
            return Vec::new();
        };
        if symptoms.requires_special_pathway() {
            return Vec::new();
        }
        let mut notes = Vec::new();
        if symptoms.contains(Symptom::AbdominalMass) {
            notes.push(AdvisoryNote::CtAtTreatmentDecision);
        }
        if symptoms.contains(Symptom::IronDeficiencyAnaemia) {
            notes.push(AdvisoryNote::OgdAtTreatmentDecision);
        }
        notes
    }

    /// Record one answer.
    ///
    /// The question must be the one the engine is currently asking: answers
    /// out of order, repeat answers, and answers after a terminal
    /// recommendation are rejected. The answer variant must match the
    /// question's answer kind, and numeric answers must be non-negative.
    /// On any rejection the state is unchanged.
    pub fn record(&mut self, question: QuestionId, answer: Answer) -> Result<(), TriageError> {
        let expected = match engine::next_step(self)? {
            Step::Question(prompt) => prompt.question,
            Step::Recommendation(_) => return Err(TriageError::EncounterComplete),
        };
        if question != expected {
            return Err(TriageError::OutOfOrder {
                expected,
                got: question,
            });
        }

        match question {
            QuestionId::Symptoms => {
                self.symptoms = Some(expect_symptoms(question, answer)?);
            }
            QuestionId::FitDone => {
                self.fit_done = Some(expect_bool(question, answer)?);
            }
            QuestionId::FitValue => {
                self.fit_result = Some(match answer {
                    Answer::Count(raw) => FitResult::Measured(checked_count(question, raw)?),
                    Answer::Unavailable => FitResult::Unavailable,
                    _ => {
                        return Err(TriageError::WrongAnswerKind {
                            question,
                            expected: "non-negative count (or unavailable)",
                        })
                    }
                });
            }
            QuestionId::FerritinAvailable => {
                self.ferritin_available = Some(expect_bool(question, answer)?);
            }
            QuestionId::FosSuitable => {
                self.fos_suitable = Some(expect_bool(question, answer)?);
            }
            QuestionId::ReturnToReferrer => {
                self.return_to_referrer = Some(expect_bool(question, answer)?);
            }
            QuestionId::HighRisk => {
                self.high_risk = Some(expect_bool(question, answer)?);
            }
            QuestionId::Age => {
                let raw = expect_count(question, answer)?;
                self.age = Some(checked_count(question, raw)?);
            }
            QuestionId::RectalBleeding => {
                self.rectal_bleeding = Some(expect_bool(question, answer)?);
            }
        }
        Ok(())
    }
}

fn expect_bool(question: QuestionId, answer: Answer) -> Result<bool, TriageError> {
    match answer {
        Answer::Bool(b) => Ok(b),
        _ => Err(TriageError::WrongAnswerKind {
            question,
            expected: "yes/no",
        }),
    }
}

fn expect_count(question: QuestionId, answer: Answer) -> Result<i64, TriageError> {
    match answer {
        Answer::Count(v) => Ok(v),
        _ => Err(TriageError::WrongAnswerKind {
            question,
            expected: "non-negative count",
        }),
    }
}

fn expect_symptoms(question: QuestionId, answer: Answer) -> Result<SymptomSet, TriageError> {
    match answer {
        Answer::Symptoms(set) => Ok(set),
        _ => Err(TriageError::WrongAnswerKind {
            question,
            expected: "symptom multi-select",
        }),
    }
}

fn checked_count(question: QuestionId, raw: i64) -> Result<u32, TriageError> {
    if raw < 0 {
        return Err(TriageError::NegativeValue {
            question,
            value: raw,
        });
    }
    u32::try_from(raw).map_err(|_| TriageError::ValueOutOfRange {
        question,
        value: raw,
    })
}

/// A non-branching informational note for the clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryNote {
    /// Abdominal mass present: CT required at the treatment-decision point
    /// if no index CT exists or if clinically indicated.
    CtAtTreatmentDecision,
    /// IDA present: OGD required at the treatment-decision point under the
    /// same condition.
    OgdAtTreatmentDecision,
}

impl AdvisoryNote {
    pub fn text(&self) -> &'static str {
        match self {
            AdvisoryNote::CtAtTreatmentDecision => {
                "Note: CT required at PTL (if no index CT) once colonic investigation is complete or if clinically indicated."
            }
            AdvisoryNote::OgdAtTreatmentDecision => {
                "Note: OGD required at PTL once colonic investigation is complete or if clinically indicated."
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
