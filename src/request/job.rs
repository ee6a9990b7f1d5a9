//! Typed wire representation of a job document
//!
//! These structs mirror the JSON/YAML a user writes. They are deliberately loose (everything
//! optional, enumerations kept as strings) so that the translator can report precise errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenopacket: Option<PhenopacketDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<FamilyDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_assembly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ped: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proband: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hpo_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhenopacketDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phenotypic_features: Vec<PhenotypicFeatureDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hts_files: Vec<HtsFileDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDoc {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhenotypicFeatureDoc {
    #[serde(rename = "type")]
    pub term: OntologyClassDoc,
    #[serde(default)]
    pub excluded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OntologyClassDoc {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtsFileDoc {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hts_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_assembly: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proband: Option<PhenopacketDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedigree: Option<PedigreeDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hts_files: Vec<HtsFileDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PedigreeDoc {
    #[serde(default)]
    pub persons: Vec<PersonDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    pub individual_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paternal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maternal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_status: Option<String>,
}

/// An explicit analysis: global settings, ordered steps and optionally the legacy sample fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_assembly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ped: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proband: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hpo_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_mode: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inheritance_modes: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequency_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pathogenicity_sources: Vec<String>,
    #[serde(default)]
    pub steps: Vec<AnalysisStep>,
}

impl AnalysisDoc {
    /// Whether any of the legacy sample-level fields were filled in
    pub fn has_sample_fields(&self) -> bool {
        self.vcf.is_some() || self.proband.is_some() || self.ped.is_some() || !self.hpo_ids.is_empty()
    }

    pub fn embedded_sample(&self) -> SampleDoc {
        SampleDoc {
            genome_assembly: self.genome_assembly.clone(),
            vcf: self.vcf.clone(),
            ped: self.ped.clone(),
            proband: self.proband.clone(),
            hpo_ids: self.hpo_ids.clone(),
        }
    }
}

/// One step, written as a single-key object e.g. `{frequencyFilter: {maxFrequency: 1.0}}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStep {
    IntervalFilter(IntervalFilterDoc),
    GenePanelFilter(GenePanelFilterDoc),
    VariantEffectFilter(VariantEffectFilterDoc),
    QualityFilter(QualityFilterDoc),
    KnownVariantFilter(NoOptions),
    FrequencyFilter(FrequencyFilterDoc),
    PathogenicityFilter(PathogenicityFilterDoc),
    InheritanceFilter(NoOptions),
    PriorityScoreFilter(PriorityScoreFilterDoc),
    RegulatoryFeatureFilter(NoOptions),
    FailedVariantFilter(NoOptions),
    OmimPrioritiser(NoOptions),
    HiPhivePrioritiser(HiPhivePrioritiserDoc),
    PhivePrioritiser(NoOptions),
    PhenixPrioritiser(NoOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NoOptions {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct IntervalFilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanelFilterDoc {
    #[serde(default)]
    pub gene_symbols: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VariantEffectFilterDoc {
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quality: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyFilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frequency: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathogenicityFilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_non_pathogenic: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScoreFilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_priority_score: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiPhivePrioritiserDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_gene_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_params: Option<String>,
}
