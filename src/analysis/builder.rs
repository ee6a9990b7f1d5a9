//! Accumulates steps into a [`PipelineSpec`], validating each one as it is added
//!
//! Global settings must be configured before the steps that depend on them. Steps are kept in
//! exactly the order they are added.

use std::collections::BTreeSet;

use log::debug;

use crate::analysis::catalog::{Precondition, PriorityType, StepCategory, StepKind};
use crate::analysis::options::{HiPhiveOptions, OptionResolver};
use crate::analysis::settings::{AnalysisMode, GlobalSettings, InheritanceModeOptions};
use crate::analysis::step::{IntervalSource, PipelineSpec, StepSpec};
use crate::error::BuildError;
use crate::model::effect::VariantEffect;
use crate::model::source::{FrequencySource, PathogenicitySource};

#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    settings: GlobalSettings,
    steps: Vec<StepSpec>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder::default()
    }

    pub fn analysis_mode(mut self, analysis_mode: AnalysisMode) -> Self {
        self.settings.analysis_mode = analysis_mode;
        self
    }

    pub fn inheritance_modes(mut self, inheritance_modes: InheritanceModeOptions) -> Self {
        self.settings.inheritance_modes = inheritance_modes;
        self
    }

    pub fn frequency_sources(mut self, sources: BTreeSet<FrequencySource>) -> Self {
        self.settings.frequency_sources = sources;
        self
    }

    pub fn pathogenicity_sources(mut self, sources: BTreeSet<PathogenicitySource>) -> Self {
        self.settings.pathogenicity_sources = sources;
        self
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn add_interval_filter(self, intervals: IntervalSource) -> Result<Self, BuildError> {
        self.add_step(StepSpec::IntervalFilter { intervals })
    }

    /// Duplicate symbols are dropped, keeping the first occurrence
    pub fn add_gene_panel_filter<I, S>(self, gene_symbols: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for symbol in gene_symbols {
            let symbol = symbol.into();
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        self.add_step(StepSpec::GenePanelFilter { gene_symbols: unique })
    }

    pub fn add_variant_effect_filter(self, remove: BTreeSet<VariantEffect>) -> Result<Self, BuildError> {
        self.add_step(StepSpec::VariantEffectFilter { remove })
    }

    pub fn add_quality_filter(self, min_quality: f64) -> Result<Self, BuildError> {
        self.add_step(StepSpec::QualityFilter { min_quality })
    }

    pub fn add_known_variant_filter(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::KnownVariantFilter)
    }

    /// Without an explicit threshold the highest inheritance mode cutoff is used
    pub fn add_frequency_filter(self, max_frequency: Option<f32>) -> Result<Self, BuildError> {
        check_preconditions(StepKind::FrequencyFilter, None, &self.settings, &self.steps)?;
        let max_frequency = OptionResolver::new(&self.settings).max_frequency(max_frequency)?;
        self.add_step(StepSpec::FrequencyFilter { max_frequency })
    }

    pub fn add_pathogenicity_filter(self, keep_non_pathogenic: bool) -> Result<Self, BuildError> {
        self.add_step(StepSpec::PathogenicityFilter { keep_non_pathogenic })
    }

    pub fn add_inheritance_filter(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::InheritanceFilter)
    }

    pub fn add_priority_score_filter(self, priority_type: PriorityType, min_priority_score: f32) -> Result<Self, BuildError> {
        self.add_step(StepSpec::PriorityScoreFilter { priority_type, min_priority_score })
    }

    pub fn add_regulatory_feature_filter(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::RegulatoryFeatureFilter)
    }

    pub fn add_failed_variant_filter(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::FailedVariantFilter)
    }

    pub fn add_omim_prioritiser(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::OmimPrioritiser)
    }

    pub fn add_hiphive_prioritiser(self, options: HiPhiveOptions) -> Result<Self, BuildError> {
        self.add_step(StepSpec::HiPhivePrioritiser(options))
    }

    pub fn add_phive_prioritiser(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::PhivePrioritiser)
    }

    pub fn add_phenix_prioritiser(self) -> Result<Self, BuildError> {
        self.add_step(StepSpec::PhenixPrioritiser)
    }

    /// Validate a step against the settings and the steps already added, then append it
    pub fn add_step(mut self, step: StepSpec) -> Result<Self, BuildError> {
        validate_step(&step, &self.settings, &self.steps)?;
        debug!("Adding {} as step {}", step.kind().display_name(), self.steps.len());
        self.steps.push(step);
        Ok(self)
    }

    /// Freeze the pipeline. Every step is checked again in case settings changed after it was added.
    pub fn build(self) -> Result<PipelineSpec, BuildError> {
        for (index, step) in self.steps.iter().enumerate() {
            validate_step(step, &self.settings, &self.steps[..index])?;
        }
        Ok(PipelineSpec::new(self.settings, self.steps))
    }
}

fn validate_step(step: &StepSpec, settings: &GlobalSettings, preceding: &[StepSpec]) -> Result<(), BuildError> {
    let priority_type = match step {
        StepSpec::PriorityScoreFilter { priority_type, .. } => Some(*priority_type),
        _ => None,
    };
    check_preconditions(step.kind(), priority_type, settings, preceding)?;
    check_parameters(step)?;
    check_unique_prioritiser(step.kind(), preceding)
}

fn check_preconditions(
    kind: StepKind,
    priority_type: Option<PriorityType>,
    settings: &GlobalSettings,
    preceding: &[StepSpec],
) -> Result<(), BuildError> {
    for precondition in kind.preconditions() {
        match precondition {
            Precondition::FrequencySources if settings.frequency_sources.is_empty() => {
                return Err(BuildError::MissingFrequencySources { step: kind.display_name() });
            }
            Precondition::PathogenicitySources if settings.pathogenicity_sources.is_empty() => {
                return Err(BuildError::MissingPathogenicitySources);
            }
            Precondition::PrecedingPrioritiser => {
                let priority_type = priority_type.ok_or(BuildError::MissingPriorityType)?;
                let produced = preceding.iter().any(|step| step.kind().priority_type() == Some(priority_type));
                if !produced {
                    return Err(BuildError::MissingPrioritiser { priority_type: priority_type.to_string() });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_parameters(step: &StepSpec) -> Result<(), BuildError> {
    match step {
        StepSpec::IntervalFilter { intervals: IntervalSource::List(intervals) } if intervals.is_empty() => {
            Err(BuildError::MissingIntervalSpec)
        }
        StepSpec::IntervalFilter { intervals: IntervalSource::Bed(path) } if path.as_os_str().is_empty() => {
            Err(BuildError::MissingIntervalSpec)
        }
        StepSpec::GenePanelFilter { gene_symbols } if gene_symbols.is_empty() => Err(BuildError::EmptyGenePanel),
        StepSpec::VariantEffectFilter { remove } if remove.is_empty() => Err(BuildError::EmptyEffectList),
        StepSpec::QualityFilter { min_quality } if !min_quality.is_finite() || *min_quality < 0.0 => {
            Err(BuildError::MissingQualityThreshold)
        }
        StepSpec::FrequencyFilter { max_frequency } if !max_frequency.is_finite() || !(0.0..=100.0).contains(max_frequency) => {
            Err(BuildError::InvalidFrequency { value: *max_frequency })
        }
        StepSpec::PriorityScoreFilter { min_priority_score, .. } if !min_priority_score.is_finite() || *min_priority_score < 0.0 => {
            Err(BuildError::MissingMinScore)
        }
        _ => Ok(()),
    }
}

fn check_unique_prioritiser(kind: StepKind, preceding: &[StepSpec]) -> Result<(), BuildError> {
    if kind.category() != StepCategory::Prioritiser {
        return Ok(());
    }
    match preceding.iter().any(|step| step.kind() == kind) {
        true => Err(BuildError::DuplicatePrioritiser {
            priority_type: kind.priority_type().map(|t| t.to_string()).unwrap_or_else(|| kind.to_string()),
        }),
        false => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::settings::DEFAULT_FREQUENCY_SOURCES;

    #[test]
    fn keeps_insertion_order() {
        let spec = PipelineBuilder::new()
            .add_omim_prioritiser()
            .and_then(|b| b.add_failed_variant_filter())
            .and_then(|b| b.add_quality_filter(30.0))
            .and_then(|b| b.build())
            .unwrap();
        assert_eq!(
            spec.kinds(),
            vec![StepKind::OmimPrioritiser, StepKind::FailedVariantFilter, StepKind::QualityFilter]
        );
    }

    #[test]
    fn gene_panel_collapses_duplicates() {
        let spec = PipelineBuilder::new()
            .add_gene_panel_filter(["FGFR2", "FGFR1", "FGFR2"])
            .and_then(|b| b.build())
            .unwrap();
        assert_eq!(
            spec.steps()[0],
            StepSpec::GenePanelFilter { gene_symbols: vec!["FGFR2".to_string(), "FGFR1".to_string()] }
        );
    }

    #[test]
    fn empty_gene_panel_fails() {
        let err = PipelineBuilder::new().add_gene_panel_filter(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, BuildError::EmptyGenePanel);
    }

    #[test]
    fn known_variant_filter_needs_frequency_sources() {
        let err = PipelineBuilder::new().add_known_variant_filter().unwrap_err();
        assert!(matches!(err, BuildError::MissingFrequencySources { .. }));

        let ok = PipelineBuilder::new()
            .frequency_sources(DEFAULT_FREQUENCY_SOURCES.clone())
            .add_known_variant_filter();
        assert!(ok.is_ok());
    }

    #[test]
    fn frequency_sources_checked_before_threshold() {
        let err = PipelineBuilder::new().add_frequency_filter(Some(1.0)).unwrap_err();
        assert!(matches!(err, BuildError::MissingFrequencySources { .. }));
    }

    #[test]
    fn pathogenicity_filter_needs_sources() {
        let err = PipelineBuilder::new().add_pathogenicity_filter(true).unwrap_err();
        assert_eq!(err, BuildError::MissingPathogenicitySources);
    }

    #[test]
    fn priority_score_filter_needs_preceding_prioritiser() {
        let err = PipelineBuilder::new()
            .add_priority_score_filter(PriorityType::HiphivePriority, 0.5)
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingPrioritiser { .. }));

        let err = PipelineBuilder::new()
            .add_omim_prioritiser()
            .and_then(|b| b.add_priority_score_filter(PriorityType::HiphivePriority, 0.5))
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingPrioritiser { ref priority_type } if priority_type == "HIPHIVE_PRIORITY"));
    }

    #[test]
    fn prioritisers_run_once() {
        let err = PipelineBuilder::new()
            .add_omim_prioritiser()
            .and_then(|b| b.add_omim_prioritiser())
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicatePrioritiser { .. }));
    }

    #[test]
    fn build_rechecks_settings() {
        let builder = PipelineBuilder::new()
            .frequency_sources(DEFAULT_FREQUENCY_SOURCES.clone())
            .add_known_variant_filter()
            .unwrap()
            .frequency_sources(BTreeSet::new());
        assert!(matches!(builder.build(), Err(BuildError::MissingFrequencySources { .. })));
    }
}
