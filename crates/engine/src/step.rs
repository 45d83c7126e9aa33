//! Engine output types: the next question to pose, or the terminal
//! recommendation for a completed encounter.

use std::fmt;

use serde::Serialize;

use crate::state::QuestionId;
use crate::symptom::Symptom;

/// Which stretch of the pathway the encounter is currently in.
///
/// Routing is a walk over these states; every `TriageState` classifies
/// into exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    InitialPresentation,
    /// Rectal/anal mass or ulceration: FIT not required, every question is
    /// surfaced for review, terminal outcome is fixed.
    SpecialPathway,
    FitStatus,
    FitBelow10,
    FitAbove10,
    AgeSymptom,
    Terminal,
}

impl Pathway {
    pub fn label(&self) -> &'static str {
        match self {
            Pathway::InitialPresentation => "Initial presentation",
            Pathway::SpecialPathway => "Rectal/anal mass sub-pathway",
            Pathway::FitStatus => "FIT test status",
            Pathway::FitBelow10 => "FIT <10 pathway",
            Pathway::FitAbove10 => "FIT >=10 pathway",
            Pathway::AgeSymptom => "FIT 10-99 pathway",
            Pathway::Terminal => "Terminal",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The shape of answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    YesNo,
    Count,
    MultiSelect,
}

/// The next question to pose to the clinician. Derived purely from the
/// `TriageState`; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPrompt {
    pub question: QuestionId,
    pub text: &'static str,
    pub kind: AnswerKind,
    /// Option labels for multi-select questions; empty otherwise.
    pub options: Vec<&'static str>,
    /// The pathway stretch this question belongs to.
    pub pathway: Pathway,
}

impl QuestionPrompt {
    /// Build the prompt for a question within a pathway stretch.
    pub(crate) fn new(question: QuestionId, pathway: Pathway) -> Self {
        let (text, kind) = match question {
            QuestionId::Symptoms => (
                "Which of the following symptom(s) does the patient have?",
                AnswerKind::MultiSelect,
            ),
            QuestionId::FitDone => ("Has a FIT test been performed?", AnswerKind::YesNo),
            QuestionId::FitValue => ("Enter the FIT test result:", AnswerKind::Count),
            QuestionId::FerritinAvailable => ("Is ferritin level available?", AnswerKind::YesNo),
            QuestionId::FosSuitable => (
                "The patient has a rectal or anal mass, or anal ulceration. Are they suitable for urgent Flexible Sigmoidoscopy (FOS)?",
                AnswerKind::YesNo,
            ),
            QuestionId::ReturnToReferrer => (
                "FIT <10 (or missing ferritin). Do you want to return to referrer?",
                AnswerKind::YesNo,
            ),
            QuestionId::HighRisk => (
                "Does the patient have WHO performance status 3/4, significant comorbidities/dementia, or are they >=80 years old?",
                AnswerKind::YesNo,
            ),
            QuestionId::Age => ("Enter the patient's age:", AnswerKind::Count),
            QuestionId::RectalBleeding => {
                ("Does the patient have rectal bleeding?", AnswerKind::YesNo)
            }
        };
        let options = match kind {
            AnswerKind::MultiSelect => Symptom::ALL.iter().map(|s| s.label()).collect(),
            _ => Vec::new(),
        };
        QuestionPrompt {
            question,
            text,
            kind,
            options,
            pathway,
        }
    }
}

/// Machine-readable terminal outcome of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCode {
    RectalAnalMass,
    FitBelow10,
    HighRiskTriaged,
    Colonoscopy,
    AgeSymptom,
    LocalGuidelines,
}

impl RecommendationCode {
    /// The pathway-completion string for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCode::RectalAnalMass => "End of rectal/anal mass pathway",
            RecommendationCode::FitBelow10 => "End of FIT <10 pathway",
            RecommendationCode::HighRiskTriaged => "High-risk group triaged",
            RecommendationCode::Colonoscopy => "Colonoscopy pathway",
            RecommendationCode::AgeSymptom => "End of age/symptom triage",
            RecommendationCode::LocalGuidelines => {
                "Triage pathway complete. Refer back to local guidelines if unclear."
            }
        }
    }
}

impl fmt::Display for RecommendationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal recommendation: the outcome code plus the clinical guidance
/// lines for the clinician. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub code: RecommendationCode,
    pub guidance: Vec<&'static str>,
}

/// The engine's answer to "what happens next, given the answers so far".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Question(QuestionPrompt),
    Recommendation(Recommendation),
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
