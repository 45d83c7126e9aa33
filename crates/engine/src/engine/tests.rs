use super::*;
use crate::state::Answer;
use crate::symptom::Symptom;

fn sym(list: &[Symptom]) -> Answer {
    Answer::Symptoms(list.iter().copied().collect())
}

/// Build a state by recording answers in order, panicking on rejection.
fn answered(steps: &[(QuestionId, Answer)]) -> TriageState {
    let mut state = TriageState::new();
    for (question, answer) in steps {
        state
            .record(*question, answer.clone())
            .unwrap_or_else(|e| panic!("recording {:?} failed: {}", question, e));
    }
    state
}

fn expect_question(state: &TriageState, question: QuestionId, pathway: Pathway) {
    match next_step(state).unwrap() {
        Step::Question(prompt) => {
            assert_eq!(prompt.question, question);
            assert_eq!(prompt.pathway, pathway);
        }
        Step::Recommendation(rec) => {
            panic!("expected question {:?}, got recommendation {:?}", question, rec.code)
        }
    }
}

fn expect_recommendation(state: &TriageState, code: RecommendationCode) -> Recommendation {
    match next_step(state).unwrap() {
        Step::Recommendation(rec) => {
            assert_eq!(rec.code, code);
            rec
        }
        Step::Question(prompt) => {
            panic!("expected recommendation {:?}, got question {:?}", code, prompt.question)
        }
    }
}

// ──────────────────────────────────────────────
// Normal pathway question order
// ──────────────────────────────────────────────

#[test]
fn empty_state_asks_for_symptoms() {
    expect_question(
        &TriageState::new(),
        QuestionId::Symptoms,
        Pathway::InitialPresentation,
    );
}

#[test]
fn normal_pathway_asks_fit_questions_in_order() {
    let mut state = TriageState::new();
    state.record(QuestionId::Symptoms, sym(&[])).unwrap();
    expect_question(&state, QuestionId::FitDone, Pathway::FitStatus);

    state.record(QuestionId::FitDone, Answer::Bool(true)).unwrap();
    expect_question(&state, QuestionId::FitValue, Pathway::FitStatus);

    state.record(QuestionId::FitValue, Answer::Count(42)).unwrap();
    expect_question(&state, QuestionId::FerritinAvailable, Pathway::FitStatus);

    state
        .record(QuestionId::FerritinAvailable, Answer::Bool(true))
        .unwrap();
    expect_question(&state, QuestionId::HighRisk, Pathway::FitAbove10);
}

#[test]
fn fit_not_done_routes_to_below_10() {
    let state = answered(&[
        (QuestionId::Symptoms, sym(&[Symptom::ChangeOfBowelHabit])),
        (QuestionId::FitDone, Answer::Bool(false)),
    ]);
    expect_question(&state, QuestionId::ReturnToReferrer, Pathway::FitBelow10);
}

#[test]
fn measured_below_10_routes_to_below_10() {
    let state = answered(&[
        (QuestionId::Symptoms, sym(&[])),
        (QuestionId::FitDone, Answer::Bool(true)),
        (QuestionId::FitValue, Answer::Count(9)),
        (QuestionId::FerritinAvailable, Answer::Bool(true)),
    ]);
    expect_question(&state, QuestionId::ReturnToReferrer, Pathway::FitBelow10);
}

#[test]
fn below_10_terminal_guidance_follows_return_answer() {
    let mut state = answered(&[
        (QuestionId::Symptoms, sym(&[])),
        (QuestionId::FitDone, Answer::Bool(false)),
    ]);
    let mut other = state.clone();

    state
        .record(QuestionId::ReturnToReferrer, Answer::Bool(true))
        .unwrap();
    let rec = expect_recommendation(&state, RecommendationCode::FitBelow10);
    assert_eq!(rec.guidance[0], "Send template letter to Primary Care advising:");

    other
        .record(QuestionId::ReturnToReferrer, Answer::Bool(false))
        .unwrap();
    let rec = expect_recommendation(&other, RecommendationCode::FitBelow10);
    assert_eq!(rec.guidance, vec!["Consider local exceptions or reason to proceed."]);
}

// ──────────────────────────────────────────────
// FIT >=10 pathway
// ──────────────────────────────────────────────

fn fit_measured(value: i64) -> TriageState {
    answered(&[
        (QuestionId::Symptoms, sym(&[])),
        (QuestionId::FitDone, Answer::Bool(true)),
        (QuestionId::FitValue, Answer::Count(value)),
        (QuestionId::FerritinAvailable, Answer::Bool(true)),
    ])
}

#[test]
fn high_risk_yes_is_terminal_regardless_of_value() {
    for value in [10, 99, 100, 2000] {
        let mut state = fit_measured(value);
        state.record(QuestionId::HighRisk, Answer::Bool(true)).unwrap();
        let rec = expect_recommendation(&state, RecommendationCode::HighRiskTriaged);
        assert_eq!(
            rec.guidance,
            vec!["Perform telephone triage. Assess suitability for endoscopy or imaging."]
        );
    }
}

#[test]
fn fit_100_not_high_risk_recommends_colonoscopy() {
    let mut state = fit_measured(100);
    state.record(QuestionId::HighRisk, Answer::Bool(false)).unwrap();
    expect_recommendation(&state, RecommendationCode::Colonoscopy);
}

#[test]
fn fit_10_not_high_risk_enters_age_symptom_not_colonoscopy() {
    let mut state = fit_measured(10);
    state.record(QuestionId::HighRisk, Answer::Bool(false)).unwrap();
    match next_step(&state).unwrap() {
        Step::Question(prompt) => {
            assert_eq!(prompt.question, QuestionId::Age);
            assert_eq!(prompt.pathway, Pathway::AgeSymptom);
            assert_eq!(prompt.pathway.label(), "FIT 10-99 pathway");
        }
        Step::Recommendation(rec) => panic!("expected age question, got {:?}", rec.code),
    }
}

#[test]
fn fit_99_stays_in_age_symptom_fit_100_does_not() {
    let mut state = fit_measured(99);
    state.record(QuestionId::HighRisk, Answer::Bool(false)).unwrap();
    assert_eq!(pathway(&state).unwrap(), Pathway::AgeSymptom);

    let mut state = fit_measured(100);
    state.record(QuestionId::HighRisk, Answer::Bool(false)).unwrap();
    assert_eq!(pathway(&state).unwrap(), Pathway::Terminal);
}

#[test]
fn unavailable_fit_result_falls_back_to_local_guidelines() {
    let state = answered(&[
        (QuestionId::Symptoms, sym(&[])),
        (QuestionId::FitDone, Answer::Bool(true)),
        (QuestionId::FitValue, Answer::Unavailable),
        (QuestionId::FerritinAvailable, Answer::Bool(false)),
    ]);
    let rec = expect_recommendation(&state, RecommendationCode::LocalGuidelines);
    assert_eq!(
        rec.code.as_str(),
        "Triage pathway complete. Refer back to local guidelines if unclear."
    );
}

// ──────────────────────────────────────────────
// Age/symptom partition
// ──────────────────────────────────────────────

fn age_symptom_outcome(age: i64, rectal_bleeding: bool) -> Recommendation {
    let mut state = fit_measured(50);
    state.record(QuestionId::HighRisk, Answer::Bool(false)).unwrap();
    state.record(QuestionId::Age, Answer::Count(age)).unwrap();
    state
        .record(QuestionId::RectalBleeding, Answer::Bool(rectal_bleeding))
        .unwrap();
    expect_recommendation(&state, RecommendationCode::AgeSymptom)
}

#[test]
fn age_partition_first_match_wins() {
    let cases: [(i64, bool, &str); 9] = [
        (35, false, "Offer Colon Capsule. If not suitable, proceed to colonoscopy."),
        (39, false, "Offer Colon Capsule. If not suitable, proceed to colonoscopy."),
        (40, true, "Book colonoscopy."),
        (45, true, "Book colonoscopy."),
        (59, true, "Book colonoscopy."),
        (60, true, "Book CTC or colonoscopy based on clinical judgment."),
        (60, false, "Colonoscopy is first choice. If not suitable, book CTC."),
        (45, false, "Check local guidelines or consider alternative pathways."),
        (39, true, "Check local guidelines or consider alternative pathways."),
    ];
    for (age, bleeding, expected) in cases {
        let rec = age_symptom_outcome(age, bleeding);
        assert_eq!(
            rec.guidance,
            vec![expected],
            "age {} bleeding {}",
            age,
            bleeding
        );
    }
}

// ──────────────────────────────────────────────
// Rectal/anal mass sub-pathway
// ──────────────────────────────────────────────

#[test]
fn special_pathway_surfaces_every_question_then_fixed_terminal() {
    let mut state = TriageState::new();
    state
        .record(QuestionId::Symptoms, sym(&[Symptom::RectalMass]))
        .unwrap();

    let sequence = [
        (QuestionId::FitDone, Answer::Bool(true)),
        (QuestionId::FitValue, Answer::Count(250)),
        (QuestionId::FerritinAvailable, Answer::Bool(true)),
        (QuestionId::FosSuitable, Answer::Bool(true)),
        (QuestionId::ReturnToReferrer, Answer::Bool(false)),
        (QuestionId::HighRisk, Answer::Bool(true)),
        (QuestionId::Age, Answer::Count(72)),
        (QuestionId::RectalBleeding, Answer::Bool(true)),
    ];
    for (question, answer) in sequence {
        expect_question(&state, question, Pathway::SpecialPathway);
        state.record(question, answer).unwrap();
    }

    // FIT 250, high-risk yes, age 72: none of it changes the terminal.
    let rec = expect_recommendation(&state, RecommendationCode::RectalAnalMass);
    assert_eq!(rec.guidance[0], "Perform urgent FOS.");
}

#[test]
fn special_pathway_skips_fit_result_when_test_not_done() {
    let mut state = TriageState::new();
    state
        .record(QuestionId::Symptoms, sym(&[Symptom::AnalUlceration]))
        .unwrap();
    state.record(QuestionId::FitDone, Answer::Bool(false)).unwrap();
    expect_question(&state, QuestionId::FosSuitable, Pathway::SpecialPathway);
}

#[test]
fn special_pathway_guidance_follows_fos_answer() {
    let state = answered(&[
        (QuestionId::Symptoms, sym(&[Symptom::AnalMass])),
        (QuestionId::FitDone, Answer::Bool(false)),
        (QuestionId::FosSuitable, Answer::Bool(false)),
        (QuestionId::ReturnToReferrer, Answer::Bool(true)),
        (QuestionId::HighRisk, Answer::Bool(false)),
        (QuestionId::Age, Answer::Count(55)),
        (QuestionId::RectalBleeding, Answer::Bool(false)),
    ]);
    let rec = expect_recommendation(&state, RecommendationCode::RectalAnalMass);
    assert_eq!(
        rec.guidance,
        vec!["Consider Clinical Endoscopist Telephone Triage or urgent CR OPA if indicated."]
    );
}

#[test]
fn mixed_symptoms_with_rectal_mass_still_divert() {
    let mut state = TriageState::new();
    state
        .record(
            QuestionId::Symptoms,
            sym(&[Symptom::AbdominalMass, Symptom::UnexplainedWeightLoss, Symptom::RectalMass]),
        )
        .unwrap();
    expect_question(&state, QuestionId::FitDone, Pathway::SpecialPathway);
}

// ──────────────────────────────────────────────
// Consistency validation
// ──────────────────────────────────────────────

#[test]
fn answers_before_symptoms_are_rejected() {
    let state: TriageState = serde_json::from_str(r#"{"fit_done": true}"#).unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::FitDone
        }
    );
}

#[test]
fn fit_value_without_fit_done_is_rejected() {
    let state: TriageState = serde_json::from_str(
        r#"{"symptoms": [], "fit_done": false, "fit_result": {"measured": 40}}"#,
    )
    .unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::FitValue
        }
    );
}

#[test]
fn fos_answer_on_normal_pathway_is_rejected() {
    let state: TriageState =
        serde_json::from_str(r#"{"symptoms": [], "fos_suitable": true}"#).unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::FosSuitable
        }
    );
}

#[test]
fn high_risk_answer_below_threshold_is_rejected() {
    let state: TriageState = serde_json::from_str(
        r#"{"symptoms": [], "fit_done": true, "fit_result": {"measured": 5},
            "ferritin_available": true, "high_risk": false}"#,
    )
    .unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::HighRisk
        }
    );
}

#[test]
fn age_answer_without_age_symptom_context_is_rejected() {
    let state: TriageState = serde_json::from_str(
        r#"{"symptoms": [], "fit_done": false, "age": 50}"#,
    )
    .unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::Age
        }
    );
}

#[test]
fn unavailable_result_with_branch_answers_is_rejected() {
    // An unavailable FIT result must not satisfy either threshold branch.
    let state: TriageState = serde_json::from_str(
        r#"{"symptoms": [], "fit_done": true, "fit_result": "unavailable",
            "ferritin_available": true, "high_risk": false}"#,
    )
    .unwrap();
    assert_eq!(
        next_step(&state).unwrap_err(),
        TriageError::InconsistentState {
            question: QuestionId::HighRisk
        }
    );
}

// ──────────────────────────────────────────────
// Idempotence
// ──────────────────────────────────────────────

#[test]
fn next_step_is_idempotent_at_every_stage() {
    let mut state = TriageState::new();
    let script = [
        (QuestionId::Symptoms, sym(&[Symptom::UnexplainedAbdominalPain])),
        (QuestionId::FitDone, Answer::Bool(true)),
        (QuestionId::FitValue, Answer::Count(15)),
        (QuestionId::FerritinAvailable, Answer::Bool(true)),
        (QuestionId::HighRisk, Answer::Bool(false)),
        (QuestionId::Age, Answer::Count(64)),
        (QuestionId::RectalBleeding, Answer::Bool(false)),
    ];
    for (question, answer) in script {
        assert_eq!(next_step(&state).unwrap(), next_step(&state).unwrap());
        state.record(question, answer).unwrap();
    }
    assert_eq!(next_step(&state).unwrap(), next_step(&state).unwrap());
}
