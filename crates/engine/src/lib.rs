//! Lower GI 2WW triage pathway decision engine.
//!
//! Encodes the guided, branching triage pathway for patients referred
//! under the two-week-wait suspected lower gastrointestinal cancer
//! pathway: presenting symptoms, FIT result, ferritin availability,
//! high-risk screen, and the age/rectal-bleeding partition, down to a
//! terminal clinical recommendation.
//!
//! The engine is a pure function over accumulated answers. A host
//! presentation layer (CLI wizard, web form, HTTP endpoint) drives it in
//! a loop:
//!
//! 1. call [`next_step`] with the answers so far;
//! 2. render the returned [`QuestionPrompt`] (or stop on a
//!    [`Recommendation`]);
//! 3. record the clinician's answer with [`TriageState::record`];
//! 4. repeat.
//!
//! All branching lives here; the host never routes. The engine performs
//! no IO, stores nothing, and holds no state across encounters -- one
//! `TriageState` per encounter, never shared.

pub mod engine;
pub mod error;
pub mod state;
pub mod step;
pub mod symptom;

pub use engine::{next_step, pathway};
pub use error::TriageError;
pub use state::{AdvisoryNote, Answer, FitResult, QuestionId, TriageState};
pub use step::{AnswerKind, Pathway, QuestionPrompt, Recommendation, RecommendationCode, Step};
pub use symptom::{Symptom, SymptomSet};
