use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::StepKind;
use crate::model::effect::VariantEffect;
use crate::model::source::{FrequencySource, PathogenicitySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterStatus {
    Pass,
    Fail,
}

/// The outcome of one filter step for one variant or gene, keyed by the step's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTriage {
    pub step: usize,
    pub kind: StepKind,
    pub status: FilterStatus,
    pub explanation: Option<String>,
}

impl FilterTriage {
    pub fn passed(&self) -> bool {
        self.status == FilterStatus::Pass
    }
}

/// A single called genomic change with the annotations the ingestion step attached to it
///
/// The triage log is append-only and only written by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub chromosome: String,
    pub position: u64,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "alt")]
    pub alternate: String,
    pub gene_symbol: String,
    #[serde(default)]
    pub quality: f64,
    pub effect: VariantEffect,
    #[serde(default)]
    pub rs_id: Option<String>,
    /// allele frequencies, in percent
    #[serde(default)]
    pub frequencies: BTreeMap<FrequencySource, f32>,
    #[serde(default)]
    pub pathogenicity: BTreeMap<PathogenicitySource, f32>,
    /// the VCF FILTER column was PASS or '.'
    #[serde(default = "default_passed_call_filters")]
    pub passed_call_filters: bool,
    #[serde(default)]
    pub regulatory: bool,
    #[serde(default, skip_deserializing)]
    triage: Vec<FilterTriage>,
    #[serde(default, skip_deserializing)]
    removed: bool,
}

fn default_passed_call_filters() -> bool {
    true
}

impl Variant {
    pub fn new(chromosome: &str, position: u64, reference: &str, alternate: &str, gene_symbol: &str, effect: VariantEffect) -> Self {
        Variant {
            chromosome: chromosome.to_string(),
            position,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            gene_symbol: gene_symbol.to_string(),
            quality: 0.0,
            effect,
            rs_id: None,
            frequencies: BTreeMap::new(),
            pathogenicity: BTreeMap::new(),
            passed_call_filters: true,
            regulatory: false,
            triage: Vec::new(),
            removed: false,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_rs_id(mut self, rs_id: &str) -> Self {
        self.rs_id = Some(rs_id.to_string());
        self
    }

    pub fn with_frequency(mut self, source: FrequencySource, percent: f32) -> Self {
        self.frequencies.insert(source, percent);
        self
    }

    pub fn with_pathogenicity(mut self, source: PathogenicitySource, score: f32) -> Self {
        self.pathogenicity.insert(source, score);
        self
    }

    pub fn with_call_filters_failed(mut self) -> Self {
        self.passed_call_filters = false;
        self
    }

    pub fn with_regulatory(mut self, regulatory: bool) -> Self {
        self.regulatory = regulatory;
        self
    }

    pub fn triage(&self) -> &[FilterTriage] {
        &self.triage
    }

    pub(crate) fn add_triage(&mut self, triage: FilterTriage) {
        self.triage.push(triage);
    }

    /// True unless a filter step has failed this variant
    pub fn passed_filters(&self) -> bool {
        self.triage.iter().all(FilterTriage::passed)
    }

    pub fn failed_steps(&self) -> Vec<usize> {
        self.triage
            .iter()
            .filter(|triage| !triage.passed())
            .map(|triage| triage.step)
            .collect()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn max_frequency(&self, sources: &BTreeSet<FrequencySource>) -> Option<f32> {
        self.frequencies
            .iter()
            .filter(|(source, _)| sources.contains(source))
            .map(|(_, frequency)| *frequency)
            .reduce(f32::max)
    }

    pub fn max_pathogenicity(&self, sources: &BTreeSet<PathogenicitySource>) -> Option<f32> {
        self.pathogenicity
            .iter()
            .filter(|(source, _)| sources.contains(source))
            .map(|(_, score)| *score)
            .reduce(f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_frequency_only_counts_enabled_sources() {
        let variant = Variant::new("1", 100, "A", "T", "GENE1", VariantEffect::MissenseVariant)
            .with_frequency(FrequencySource::EspAll, 0.5)
            .with_frequency(FrequencySource::GnomadEAfr, 4.0);
        let sources = BTreeSet::from([FrequencySource::EspAll, FrequencySource::ThousandGenomes]);
        assert_eq!(variant.max_frequency(&sources), Some(0.5));
        assert_eq!(variant.max_frequency(&BTreeSet::new()), None);
    }

    #[test]
    fn deserialises_with_defaults() {
        let json = r#"{"chromosome": "1", "position": 12345, "ref": "A", "alt": "G",
            "geneSymbol": "FGFR2", "quality": 60.0, "effect": "MISSENSE_VARIANT",
            "frequencies": {"ESP_ALL": 0.01}, "pathogenicity": {"REVEL": 0.9}}"#;
        let variant: Variant = serde_json::from_str(json).unwrap();
        assert!(variant.passed_call_filters);
        assert!(variant.triage().is_empty());
        assert_eq!(variant.frequencies[&FrequencySource::EspAll], 0.01);
        assert_eq!(variant.pathogenicity[&PathogenicitySource::Revel], 0.9);
    }
}
