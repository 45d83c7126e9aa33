//! The fixed symptom catalogue for the Lower GI 2WW referral pathway.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eleven presenting symptoms recognised by the pathway.
///
/// The catalogue is fixed: it is the set of presentations a 2WW lower GI
/// referral can carry, and nothing else. Three of the eleven (rectal mass,
/// anal mass, anal ulceration) do not require a FIT result and divert the
/// encounter into the rectal/anal mass sub-pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    AbdominalMass,
    ChangeOfBowelHabit,
    UnexplainedWeightLoss,
    UnexplainedRectalBleeding,
    UnexplainedAbdominalPain,
    IronDeficiencyAnaemia,
    AnaemiaWithoutIda,
    IncidentalFinding,
    RectalMass,
    AnalMass,
    AnalUlceration,
}

impl Symptom {
    /// The full catalogue, in referral-form order.
    pub const ALL: [Symptom; 11] = [
        Symptom::AbdominalMass,
        Symptom::ChangeOfBowelHabit,
        Symptom::UnexplainedWeightLoss,
        Symptom::UnexplainedRectalBleeding,
        Symptom::UnexplainedAbdominalPain,
        Symptom::IronDeficiencyAnaemia,
        Symptom::AnaemiaWithoutIda,
        Symptom::IncidentalFinding,
        Symptom::RectalMass,
        Symptom::AnalMass,
        Symptom::AnalUlceration,
    ];

    /// Human-readable label as it appears on the referral form.
    pub fn label(&self) -> &'static str {
        match self {
            Symptom::AbdominalMass => "Abdominal mass",
            Symptom::ChangeOfBowelHabit => "Change of bowel habit",
            Symptom::UnexplainedWeightLoss => "Unexplained weight loss",
            Symptom::UnexplainedRectalBleeding => "Unexplained rectal bleeding",
            Symptom::UnexplainedAbdominalPain => "Unexplained abdominal pain",
            Symptom::IronDeficiencyAnaemia => "Iron-deficiency anaemia (IDA)",
            Symptom::AnaemiaWithoutIda => "Anaemia (in the absence of IDA)",
            Symptom::IncidentalFinding => "Incidental finding",
            Symptom::RectalMass => "Rectal mass (FIT not required)",
            Symptom::AnalMass => "Unexplained anal mass (FIT not required)",
            Symptom::AnalUlceration => "Unexplained anal ulceration (FIT not required)",
        }
    }

    /// True for presentations that bypass the FIT requirement and divert
    /// into the rectal/anal mass sub-pathway.
    pub fn fit_not_required(&self) -> bool {
        matches!(
            self,
            Symptom::RectalMass | Symptom::AnalMass | Symptom::AnalUlceration
        )
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of symptoms selected for one patient encounter.
///
/// Insertion order is irrelevant and duplicates are impossible. Zero
/// selections is a legal encounter (the normal pathway still applies).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSet(BTreeSet<Symptom>);

impl SymptomSet {
    pub fn new() -> Self {
        SymptomSet(BTreeSet::new())
    }

    /// Add a symptom. Returns false if it was already present.
    pub fn insert(&mut self, symptom: Symptom) -> bool {
        self.0.insert(symptom)
    }

    pub fn contains(&self, symptom: Symptom) -> bool {
        self.0.contains(&symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symptom> + '_ {
        self.0.iter().copied()
    }

    /// True when any selected symptom diverts the encounter into the
    /// rectal/anal mass sub-pathway (FIT not required for these).
    pub fn requires_special_pathway(&self) -> bool {
        self.0.iter().any(|s| s.fit_not_required())
    }
}

impl FromIterator<Symptom> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        SymptomSet(iter.into_iter().collect())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
