use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::analysis::catalog::{PriorityType, StepKind};
use crate::analysis::options::HiPhiveOptions;
use crate::analysis::settings::GlobalSettings;
use crate::model::effect::VariantEffect;
use crate::model::interval::GeneticInterval;

/// Where an interval filter's regions come from. BED files are only read when the step runs.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalSource {
    Single(GeneticInterval),
    List(Vec<GeneticInterval>),
    Bed(PathBuf),
}

/// A fully resolved step, carrying only the parameters its kind needs
#[derive(Debug, Clone, PartialEq)]
pub enum StepSpec {
    IntervalFilter { intervals: IntervalSource },
    GenePanelFilter { gene_symbols: Vec<String> },
    VariantEffectFilter { remove: BTreeSet<VariantEffect> },
    QualityFilter { min_quality: f64 },
    KnownVariantFilter,
    FrequencyFilter { max_frequency: f32 },
    PathogenicityFilter { keep_non_pathogenic: bool },
    InheritanceFilter,
    PriorityScoreFilter { priority_type: PriorityType, min_priority_score: f32 },
    RegulatoryFeatureFilter,
    FailedVariantFilter,
    OmimPrioritiser,
    HiPhivePrioritiser(HiPhiveOptions),
    PhivePrioritiser,
    PhenixPrioritiser,
}

impl StepSpec {
    pub fn kind(&self) -> StepKind {
        match self {
            StepSpec::IntervalFilter { .. } => StepKind::IntervalFilter,
            StepSpec::GenePanelFilter { .. } => StepKind::GenePanelFilter,
            StepSpec::VariantEffectFilter { .. } => StepKind::VariantEffectFilter,
            StepSpec::QualityFilter { .. } => StepKind::QualityFilter,
            StepSpec::KnownVariantFilter => StepKind::KnownVariantFilter,
            StepSpec::FrequencyFilter { .. } => StepKind::FrequencyFilter,
            StepSpec::PathogenicityFilter { .. } => StepKind::PathogenicityFilter,
            StepSpec::InheritanceFilter => StepKind::InheritanceFilter,
            StepSpec::PriorityScoreFilter { .. } => StepKind::PriorityScoreFilter,
            StepSpec::RegulatoryFeatureFilter => StepKind::RegulatoryFeatureFilter,
            StepSpec::FailedVariantFilter => StepKind::FailedVariantFilter,
            StepSpec::OmimPrioritiser => StepKind::OmimPrioritiser,
            StepSpec::HiPhivePrioritiser(_) => StepKind::HiPhivePrioritiser,
            StepSpec::PhivePrioritiser => StepKind::PhivePrioritiser,
            StepSpec::PhenixPrioritiser => StepKind::PhenixPrioritiser,
        }
    }
}

/// An ordered, validated sequence of steps and the settings they run under.
///
/// Only [`PipelineBuilder`](crate::analysis::builder::PipelineBuilder) creates these, and they
/// can't be changed afterwards, so they are safe to share between concurrently running jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSpec {
    settings: GlobalSettings,
    steps: Vec<StepSpec>,
}

impl PipelineSpec {
    pub(crate) fn new(settings: GlobalSettings, steps: Vec<StepSpec>) -> Self {
        PipelineSpec { settings, steps }
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(StepSpec::kind).collect()
    }
}
