//! Routing: the pure decision function over accumulated answers.
//!
//! `next_step` walks the pathway as a state machine. Given the answers so
//! far it returns either the next question to pose or the terminal
//! recommendation; the host presentation layer renders whatever comes back
//! and never embeds branching logic of its own.
//!
//! Key invariant: a `TriageState` uniquely determines the next step. The
//! function holds no hidden state, so re-querying with the same answers
//! returns the identical result.

use crate::error::TriageError;
use crate::state::{FitResult, QuestionId, TriageState};
use crate::step::{Pathway, QuestionPrompt, Recommendation, RecommendationCode, Step};

/// FIT concentration at or above which the FIT >=10 pathway applies.
const FIT_POSITIVE_THRESHOLD: u32 = 10;

/// FIT concentration at or above which colonoscopy is recommended outright.
const FIT_COLONOSCOPY_THRESHOLD: u32 = 100;

fn ask(question: QuestionId, pathway: Pathway) -> Step {
    Step::Question(QuestionPrompt::new(question, pathway))
}

fn recommend(code: RecommendationCode, guidance: Vec<&'static str>) -> Step {
    Step::Recommendation(Recommendation { code, guidance })
}

/// Compute the next step for an encounter.
///
/// Pure function. No IO, no side effects, no state mutation. Errors only
/// for states that carry answers to unreachable questions; every
/// consistent state maps to exactly one prompt or recommendation.
pub fn next_step(state: &TriageState) -> Result<Step, TriageError> {
    validate(state)?;

    let Some(symptoms) = state.symptoms() else {
        return Ok(ask(QuestionId::Symptoms, Pathway::InitialPresentation));
    };

    // Rectal mass, anal mass, or anal ulceration: FIT not required,
    // divert into the review-everything sub-pathway.
    if symptoms.requires_special_pathway() {
        return Ok(special_pathway(state));
    }

    let Some(fit_done) = state.fit_done() else {
        return Ok(ask(QuestionId::FitDone, Pathway::FitStatus));
    };
    if !fit_done {
        return Ok(fit_below_10(state));
    }

    let Some(fit) = state.fit_result() else {
        return Ok(ask(QuestionId::FitValue, Pathway::FitStatus));
    };
    if state.ferritin_available().is_none() {
        return Ok(ask(QuestionId::FerritinAvailable, Pathway::FitStatus));
    }

    match fit {
        // FIT performed but the result never arrived: do not guess a
        // value, close out against local guidelines.
        FitResult::Unavailable => Ok(recommend(
            RecommendationCode::LocalGuidelines,
            vec!["FIT test performed but no result is available. Refer back to local guidelines."],
        )),
        FitResult::Measured(value) if value < FIT_POSITIVE_THRESHOLD => Ok(fit_below_10(state)),
        FitResult::Measured(value) => Ok(fit_above_10(state, value)),
    }
}

/// Classify the encounter into its current pathway stretch.
pub fn pathway(state: &TriageState) -> Result<Pathway, TriageError> {
    Ok(match next_step(state)? {
        Step::Question(prompt) => prompt.pathway,
        Step::Recommendation(_) => Pathway::Terminal,
    })
}

/// Rectal/anal mass sub-pathway: sequentially surfaces every question in
/// the repertoire for clinician review, then always terminates with the
/// rectal/anal mass outcome. The guidance follows the FOS-suitability
/// answer; the other review answers are collected for the record only.
///
/// No FIT value is ever fabricated here: when the test was not done, the
/// FIT result and ferritin questions are simply not surfaced.
fn special_pathway(state: &TriageState) -> Step {
    let pathway = Pathway::SpecialPathway;

    match state.fit_done() {
        None => return ask(QuestionId::FitDone, pathway),
        Some(true) => {
            if state.fit_result().is_none() {
                return ask(QuestionId::FitValue, pathway);
            }
            if state.ferritin_available().is_none() {
                return ask(QuestionId::FerritinAvailable, pathway);
            }
        }
        Some(false) => {}
    }

    let Some(fos_suitable) = state.fos_suitable() else {
        return ask(QuestionId::FosSuitable, pathway);
    };
    if state.return_to_referrer().is_none() {
        return ask(QuestionId::ReturnToReferrer, pathway);
    }
    if state.high_risk().is_none() {
        return ask(QuestionId::HighRisk, pathway);
    }
    if state.age().is_none() {
        return ask(QuestionId::Age, pathway);
    }
    if state.rectal_bleeding().is_none() {
        return ask(QuestionId::RectalBleeding, pathway);
    }

    let guidance = if fos_suitable {
        vec![
            "Perform urgent FOS.",
            "After FOS, manage based on findings. If NAD, refer back to Primary Care.",
        ]
    } else {
        vec!["Consider Clinical Endoscopist Telephone Triage or urgent CR OPA if indicated."]
    };
    recommend(RecommendationCode::RectalAnalMass, guidance)
}

/// FIT <10 pathway: FIT not done, or measured value below 10.
fn fit_below_10(state: &TriageState) -> Step {
    let Some(return_to_referrer) = state.return_to_referrer() else {
        return ask(QuestionId::ReturnToReferrer, Pathway::FitBelow10);
    };
    let guidance = if return_to_referrer {
        vec![
            "Send template letter to Primary Care advising:",
            "- Repeat FIT test",
            "- NSS pathway (non-specific symptoms)",
            "- If symptoms persist, referral via routine pathway",
        ]
    } else {
        vec!["Consider local exceptions or reason to proceed."]
    };
    recommend(RecommendationCode::FitBelow10, guidance)
}

/// FIT >=10 pathway: high-risk screen, then colonoscopy or the age/symptom
/// sub-pathway depending on the measured value.
fn fit_above_10(state: &TriageState, value: u32) -> Step {
    let Some(high_risk) = state.high_risk() else {
        return ask(QuestionId::HighRisk, Pathway::FitAbove10);
    };
    if high_risk {
        return recommend(
            RecommendationCode::HighRiskTriaged,
            vec!["Perform telephone triage. Assess suitability for endoscopy or imaging."],
        );
    }
    if value >= FIT_COLONOSCOPY_THRESHOLD {
        return recommend(
            RecommendationCode::Colonoscopy,
            vec!["FIT >=100. Recommend colonoscopy."],
        );
    }
    age_symptom(state)
}

/// Age/symptom sub-pathway for FIT 10-99, not high-risk.
fn age_symptom(state: &TriageState) -> Step {
    let Some(age) = state.age() else {
        return ask(QuestionId::Age, Pathway::AgeSymptom);
    };
    let Some(rectal_bleeding) = state.rectal_bleeding() else {
        return ask(QuestionId::RectalBleeding, Pathway::AgeSymptom);
    };
    recommend(
        RecommendationCode::AgeSymptom,
        vec![age_symptom_guidance(age, rectal_bleeding)],
    )
}

/// The age/rectal-bleeding partition. First match wins; bounds inclusive
/// as stated in the protocol.
fn age_symptom_guidance(age: u32, rectal_bleeding: bool) -> &'static str {
    if age < 40 && !rectal_bleeding {
        "Offer Colon Capsule. If not suitable, proceed to colonoscopy."
    } else if (40..=59).contains(&age) && rectal_bleeding {
        "Book colonoscopy."
    } else if age >= 60 && rectal_bleeding {
        "Book CTC or colonoscopy based on clinical judgment."
    } else if age >= 60 && !rectal_bleeding {
        "Colonoscopy is first choice. If not suitable, book CTC."
    } else {
        "Check local guidelines or consider alternative pathways."
    }
}

/// Reject states that answer questions unreachable from the answers that
/// precede them. A freshly recorded encounter can never trip these; they
/// guard states deserialized from a host.
fn validate(state: &TriageState) -> Result<(), TriageError> {
    let inconsistent = |question| Err(TriageError::InconsistentState { question });

    let Some(symptoms) = state.symptoms() else {
        // Nothing may be answered before the symptom set.
        return match first_follow_up_answered(state) {
            Some(question) => inconsistent(question),
            None => Ok(()),
        };
    };

    // FIT result and ferritin only exist once a FIT test was performed.
    if state.fit_result().is_some() && state.fit_done() != Some(true) {
        return inconsistent(QuestionId::FitValue);
    }
    if state.ferritin_available().is_some() && state.fit_done() != Some(true) {
        return inconsistent(QuestionId::FerritinAvailable);
    }

    if symptoms.requires_special_pathway() {
        // The review sub-pathway surfaces every remaining question, so any
        // combination of the remaining answers is reachable.
        return Ok(());
    }

    // FOS suitability is only ever asked on the rectal/anal sub-pathway.
    if state.fos_suitable().is_some() {
        return inconsistent(QuestionId::FosSuitable);
    }

    let measured = state.fit_result().and_then(|f| f.measured());
    let fit_block_complete = match state.fit_done() {
        None => false,
        Some(false) => true,
        Some(true) => state.fit_result().is_some() && state.ferritin_available().is_some(),
    };
    let below_10 = state.fit_done() == Some(false)
        || matches!(measured, Some(v) if v < FIT_POSITIVE_THRESHOLD);
    let above_10 = matches!(measured, Some(v) if v >= FIT_POSITIVE_THRESHOLD);

    if state.return_to_referrer().is_some() && !(fit_block_complete && below_10) {
        return inconsistent(QuestionId::ReturnToReferrer);
    }
    if state.high_risk().is_some() && !(fit_block_complete && above_10) {
        return inconsistent(QuestionId::HighRisk);
    }

    let in_age_symptom = fit_block_complete
        && state.high_risk() == Some(false)
        && matches!(
            measured,
            Some(v) if (FIT_POSITIVE_THRESHOLD..FIT_COLONOSCOPY_THRESHOLD).contains(&v)
        );
    if state.age().is_some() && !in_age_symptom {
        return inconsistent(QuestionId::Age);
    }
    if state.rectal_bleeding().is_some() && !in_age_symptom {
        return inconsistent(QuestionId::RectalBleeding);
    }

    Ok(())
}

/// The first non-symptom question answered, if any. Used to reject states
/// that skipped the initial presentation.
fn first_follow_up_answered(state: &TriageState) -> Option<QuestionId> {
    if state.fit_done().is_some() {
        Some(QuestionId::FitDone)
    } else if state.fit_result().is_some() {
        Some(QuestionId::FitValue)
    } else if state.ferritin_available().is_some() {
        Some(QuestionId::FerritinAvailable)
    } else if state.fos_suitable().is_some() {
        Some(QuestionId::FosSuitable)
    } else if state.return_to_referrer().is_some() {
        Some(QuestionId::ReturnToReferrer)
    } else if state.high_risk().is_some() {
        Some(QuestionId::HighRisk)
    } else if state.age().is_some() {
        Some(QuestionId::Age)
    } else if state.rectal_bleeding().is_some() {
        Some(QuestionId::RectalBleeding)
    } else {
        None
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests;
