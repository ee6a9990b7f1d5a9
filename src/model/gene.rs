use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::PriorityType;
use crate::model::inheritance::SubModeOfInheritance;
use crate::model::variant::FilterTriage;

/// A relevance score recorded by one prioritiser step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    pub step: usize,
    pub priority_type: PriorityType,
    pub score: f64,
    pub explanation: String,
}

/// A gene and the evidence gathered for it during a run
///
/// Variants refer to their gene by symbol. Scores from different prioritisers are kept apart,
/// combining them into a final rank is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub symbol: String,
    #[serde(default)]
    pub entrez_id: Option<u32>,
    /// modes of inheritance the observed genotypes are compatible with
    #[serde(default)]
    pub compatible_modes: BTreeSet<SubModeOfInheritance>,
    #[serde(default, skip_deserializing)]
    scores: Vec<PriorityScore>,
    #[serde(default, skip_deserializing)]
    triage: Vec<FilterTriage>,
}

impl Gene {
    pub fn new(symbol: &str, entrez_id: Option<u32>) -> Self {
        Gene {
            symbol: symbol.to_string(),
            entrez_id,
            compatible_modes: BTreeSet::new(),
            scores: Vec::new(),
            triage: Vec::new(),
        }
    }

    pub fn with_compatible_mode(mut self, mode: SubModeOfInheritance) -> Self {
        self.compatible_modes.insert(mode);
        self
    }

    pub fn is_consistent_with_dominant(&self) -> bool {
        self.compatible_modes.iter().any(SubModeOfInheritance::is_dominant)
    }

    pub fn is_consistent_with_recessive(&self) -> bool {
        self.compatible_modes.iter().any(SubModeOfInheritance::is_recessive)
    }

    pub fn is_x_chromosomal(&self) -> bool {
        self.compatible_modes.iter().any(SubModeOfInheritance::is_x_linked)
    }

    pub fn scores(&self) -> &[PriorityScore] {
        &self.scores
    }

    pub fn score_for(&self, priority_type: PriorityType) -> Option<f64> {
        self.scores
            .iter()
            .find(|score| score.priority_type == priority_type)
            .map(|score| score.score)
    }

    pub(crate) fn add_score(&mut self, score: PriorityScore) {
        self.scores.push(score);
    }

    pub fn triage(&self) -> &[FilterTriage] {
        &self.triage
    }

    pub(crate) fn add_triage(&mut self, triage: FilterTriage) {
        self.triage.push(triage);
    }

    pub fn passed_filters(&self) -> bool {
        self.triage.iter().all(FilterTriage::passed)
    }
}
