//! Turns step specifications into runnable steps, wiring in the collaborators they need

use std::sync::Arc;

use log::debug;

use crate::analysis::settings::GlobalSettings;
use crate::analysis::step::{IntervalSource, StepSpec};
use crate::error::StepError;
use crate::run::filter::{
    FailedVariantFilter, FrequencyFilter, GeneFilter, GenePanelFilter, InheritanceFilter, IntervalFilter,
    KnownVariantFilter, PathogenicityFilter, PriorityScoreFilter, QualityFilter, RegulatoryFeatureFilter,
    VariantEffectFilter, VariantFilter,
};
use crate::run::prioritiser::{OmimPrioritiser, PhenotypePrioritiser, Prioritiser};
use crate::service::{BedFileReader, DiseaseSource, PhenotypeScorer, RegionSource};

/// A runnable step, grouped by what it works on
pub enum Step {
    Variant(Box<dyn VariantFilter>),
    Gene(Box<dyn GeneFilter>),
    Prioritiser(Box<dyn Prioritiser>),
}

pub trait StepFactory: Send + Sync {
    /// Fails when a collaborator the step depends on is missing or can't provide its data
    fn create(&self, step: &StepSpec, settings: &GlobalSettings) -> Result<Step, StepError>;
}

/// Builds the built-in step implementations
pub struct StandardStepFactory {
    regions: Arc<dyn RegionSource>,
    diseases: Option<Arc<dyn DiseaseSource>>,
    phenotypes: Option<Arc<dyn PhenotypeScorer>>,
    hpo_ids: Vec<String>,
}

impl Default for StandardStepFactory {
    fn default() -> Self {
        StandardStepFactory { regions: Arc::new(BedFileReader), diseases: None, phenotypes: None, hpo_ids: Vec::new() }
    }
}

impl StandardStepFactory {
    pub fn new() -> Self {
        StandardStepFactory::default()
    }

    pub fn with_region_source(mut self, regions: Arc<dyn RegionSource>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_disease_source(mut self, diseases: Arc<dyn DiseaseSource>) -> Self {
        self.diseases = Some(diseases);
        self
    }

    pub fn with_phenotype_scorer(mut self, phenotypes: Arc<dyn PhenotypeScorer>) -> Self {
        self.phenotypes = Some(phenotypes);
        self
    }

    /// The proband's phenotype terms, compared against genes by the phenotype prioritisers
    pub fn with_hpo_ids(mut self, hpo_ids: Vec<String>) -> Self {
        self.hpo_ids = hpo_ids;
        self
    }

    fn phenotype_scorer(&self) -> Result<Arc<dyn PhenotypeScorer>, StepError> {
        self.phenotypes.clone().ok_or(StepError::Unavailable("phenotype scorer"))
    }
}

impl StepFactory for StandardStepFactory {
    fn create(&self, step: &StepSpec, settings: &GlobalSettings) -> Result<Step, StepError> {
        debug!("Creating {}", step.kind().display_name());
        let step = match step {
            StepSpec::IntervalFilter { intervals } => {
                let intervals = match intervals {
                    IntervalSource::Single(interval) => vec![interval.clone()],
                    IntervalSource::List(intervals) => intervals.clone(),
                    IntervalSource::Bed(path) => self.regions.regions(path)?,
                };
                Step::Variant(Box::new(IntervalFilter::new(intervals)))
            }
            StepSpec::GenePanelFilter { gene_symbols } => Step::Variant(Box::new(GenePanelFilter::new(gene_symbols))),
            StepSpec::VariantEffectFilter { remove } => Step::Variant(Box::new(VariantEffectFilter::new(remove.clone()))),
            StepSpec::QualityFilter { min_quality } => Step::Variant(Box::new(QualityFilter::new(*min_quality))),
            StepSpec::KnownVariantFilter => {
                Step::Variant(Box::new(KnownVariantFilter::new(settings.frequency_sources.clone())))
            }
            StepSpec::FrequencyFilter { max_frequency } => Step::Variant(Box::new(FrequencyFilter::new(
                *max_frequency,
                settings.frequency_sources.clone(),
            ))),
            StepSpec::PathogenicityFilter { keep_non_pathogenic } => Step::Variant(Box::new(PathogenicityFilter::new(
                *keep_non_pathogenic,
                settings.pathogenicity_sources.clone(),
            ))),
            StepSpec::InheritanceFilter => {
                Step::Gene(Box::new(InheritanceFilter::new(settings.inheritance_modes.modes())))
            }
            StepSpec::PriorityScoreFilter { priority_type, min_priority_score } => {
                Step::Gene(Box::new(PriorityScoreFilter::new(*priority_type, *min_priority_score)))
            }
            StepSpec::RegulatoryFeatureFilter => Step::Variant(Box::new(RegulatoryFeatureFilter)),
            StepSpec::FailedVariantFilter => Step::Variant(Box::new(FailedVariantFilter)),
            StepSpec::OmimPrioritiser => {
                let diseases = self.diseases.clone().ok_or(StepError::Unavailable("disease data"))?;
                Step::Prioritiser(Box::new(OmimPrioritiser::new(diseases)))
            }
            StepSpec::HiPhivePrioritiser(options) => Step::Prioritiser(Box::new(PhenotypePrioritiser::hiphive(
                self.phenotype_scorer()?,
                self.hpo_ids.clone(),
                options.clone(),
            ))),
            StepSpec::PhivePrioritiser => Step::Prioritiser(Box::new(PhenotypePrioritiser::phive(
                self.phenotype_scorer()?,
                self.hpo_ids.clone(),
            ))),
            StepSpec::PhenixPrioritiser => Step::Prioritiser(Box::new(PhenotypePrioritiser::phenix(
                self.phenotype_scorer()?,
                self.hpo_ids.clone(),
            ))),
        };
        Ok(step)
    }
}
