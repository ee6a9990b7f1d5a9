//! Filters admit or reject variants, or whole genes, using the annotations ingestion attached

use std::collections::BTreeSet;

use crate::analysis::catalog::{PriorityType, StepKind};
use crate::error::StepError;
use crate::model::effect::VariantEffect;
use crate::model::gene::Gene;
use crate::model::inheritance::SubModeOfInheritance;
use crate::model::interval::{normalise_chromosome, GeneticInterval};
use crate::model::source::{FrequencySource, PathogenicitySource};
use crate::model::variant::{FilterStatus, FilterTriage, Variant};

/// Pathogenicity scores at or above this are considered damaging
pub const PATHOGENICITY_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub status: FilterStatus,
    pub explanation: Option<String>,
}

impl FilterResult {
    pub fn pass() -> Self {
        FilterResult { status: FilterStatus::Pass, explanation: None }
    }

    pub fn fail(explanation: String) -> Self {
        FilterResult { status: FilterStatus::Fail, explanation: Some(explanation) }
    }

    fn check(passed: bool, explain: impl FnOnce() -> String) -> Self {
        match passed {
            true => FilterResult::pass(),
            false => FilterResult::fail(explain()),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == FilterStatus::Pass
    }

    pub fn into_triage(self, step: usize, kind: StepKind) -> FilterTriage {
        FilterTriage { step, kind, status: self.status, explanation: self.explanation }
    }
}

pub trait VariantFilter: Send + Sync {
    fn kind(&self) -> StepKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// How the filter was configured, for the run report
    fn messages(&self) -> Vec<String>;

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError>;
}

/// A filter whose verdict on a gene applies to every variant in it
pub trait GeneFilter: Send + Sync {
    fn kind(&self) -> StepKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn messages(&self) -> Vec<String>;

    fn apply(&self, gene: &Gene) -> Result<FilterResult, StepError>;
}

pub struct IntervalFilter {
    intervals: Vec<GeneticInterval>,
}

impl IntervalFilter {
    pub fn new(intervals: Vec<GeneticInterval>) -> Self {
        IntervalFilter { intervals }
    }
}

impl VariantFilter for IntervalFilter {
    fn kind(&self) -> StepKind {
        StepKind::IntervalFilter
    }

    fn messages(&self) -> Vec<String> {
        let shown: Vec<String> = self.intervals.iter().take(10).map(ToString::to_string).collect();
        let more = match self.intervals.len() > shown.len() {
            true => format!(" and {} more", self.intervals.len() - shown.len()),
            false => String::new(),
        };
        vec![format!("Restricted variants to intervals: {}{more}", shown.join(", "))]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        let inside = match normalise_chromosome(&variant.chromosome) {
            Ok(chromosome) => self
                .intervals
                .iter()
                .any(|interval| interval.covers(&chromosome, variant.position)),
            Err(_) => false,
        };
        Ok(FilterResult::check(inside, || "outside the requested intervals".to_string()))
    }
}

pub struct GenePanelFilter {
    gene_symbols: BTreeSet<String>,
}

impl GenePanelFilter {
    pub fn new<'a>(gene_symbols: impl IntoIterator<Item = &'a String>) -> Self {
        GenePanelFilter { gene_symbols: gene_symbols.into_iter().cloned().collect() }
    }
}

impl VariantFilter for GenePanelFilter {
    fn kind(&self) -> StepKind {
        StepKind::GenePanelFilter
    }

    fn messages(&self) -> Vec<String> {
        let symbols: Vec<&str> = self.gene_symbols.iter().map(String::as_str).collect();
        vec![format!("Genes to keep: {}", symbols.join(", "))]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        Ok(FilterResult::check(self.gene_symbols.contains(&variant.gene_symbol), || {
            format!("{} is not in the gene panel", variant.gene_symbol)
        }))
    }
}

pub struct VariantEffectFilter {
    remove: BTreeSet<VariantEffect>,
}

impl VariantEffectFilter {
    pub fn new(remove: BTreeSet<VariantEffect>) -> Self {
        VariantEffectFilter { remove }
    }
}

impl VariantFilter for VariantEffectFilter {
    fn kind(&self) -> StepKind {
        StepKind::VariantEffectFilter
    }

    fn messages(&self) -> Vec<String> {
        let effects: Vec<&str> = self.remove.iter().map(VariantEffect::as_str).collect();
        vec![format!("Removed variants with effects of type: [{}]", effects.join(", "))]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        Ok(FilterResult::check(!self.remove.contains(&variant.effect), || {
            format!("effect {} is excluded", variant.effect)
        }))
    }
}

pub struct QualityFilter {
    min_quality: f64,
}

impl QualityFilter {
    pub fn new(min_quality: f64) -> Self {
        QualityFilter { min_quality }
    }
}

impl VariantFilter for QualityFilter {
    fn kind(&self) -> StepKind {
        StepKind::QualityFilter
    }

    fn messages(&self) -> Vec<String> {
        vec![format!("PHRED quality >= {:?}", self.min_quality)]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        Ok(FilterResult::check(variant.quality >= self.min_quality, || {
            format!("PHRED quality {:?} is below {:?}", variant.quality, self.min_quality)
        }))
    }
}

/// Removes variants already recorded in dbSNP or any enabled population dataset
pub struct KnownVariantFilter {
    sources: BTreeSet<FrequencySource>,
}

impl KnownVariantFilter {
    pub fn new(sources: BTreeSet<FrequencySource>) -> Self {
        KnownVariantFilter { sources }
    }
}

impl VariantFilter for KnownVariantFilter {
    fn kind(&self) -> StepKind {
        StepKind::KnownVariantFilter
    }

    fn messages(&self) -> Vec<String> {
        vec!["Removed variants with an rs id or a frequency in any enabled source".to_string()]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        if let Some(rs_id) = &variant.rs_id {
            return Ok(FilterResult::fail(format!("known variant {rs_id}")));
        }
        Ok(FilterResult::check(variant.max_frequency(&self.sources).is_none(), || {
            "observed in a population frequency source".to_string()
        }))
    }
}

pub struct FrequencyFilter {
    max_frequency: f32,
    sources: BTreeSet<FrequencySource>,
}

impl FrequencyFilter {
    pub fn new(max_frequency: f32, sources: BTreeSet<FrequencySource>) -> Self {
        FrequencyFilter { max_frequency, sources }
    }
}

impl VariantFilter for FrequencyFilter {
    fn kind(&self) -> StepKind {
        StepKind::FrequencyFilter
    }

    fn messages(&self) -> Vec<String> {
        vec![format!("Allele frequency <= {:?} %", self.max_frequency)]
    }

    /// Variants never seen in an enabled source pass
    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        match variant.max_frequency(&self.sources) {
            Some(frequency) if frequency > self.max_frequency => Ok(FilterResult::fail(format!(
                "maximum frequency {frequency:?} % exceeds {:?} %",
                self.max_frequency
            ))),
            _ => Ok(FilterResult::pass()),
        }
    }
}

pub struct PathogenicityFilter {
    keep_non_pathogenic: bool,
    sources: BTreeSet<PathogenicitySource>,
}

impl PathogenicityFilter {
    pub fn new(keep_non_pathogenic: bool, sources: BTreeSet<PathogenicitySource>) -> Self {
        PathogenicityFilter { keep_non_pathogenic, sources }
    }
}

impl VariantFilter for PathogenicityFilter {
    fn kind(&self) -> StepKind {
        StepKind::PathogenicityFilter
    }

    fn messages(&self) -> Vec<String> {
        match self.keep_non_pathogenic {
            true => vec!["Retained all non-pathogenic variants of all types. Scoring was applied, but the filter passed all variants.".to_string()],
            false => vec![format!("Removed variants predicted to be non-pathogenic (score < {PATHOGENICITY_THRESHOLD:?})")],
        }
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        if self.keep_non_pathogenic || variant.effect.is_loss_of_function() {
            return Ok(FilterResult::pass());
        }
        let score = variant.max_pathogenicity(&self.sources);
        Ok(FilterResult::check(score.map_or(false, |s| s >= PATHOGENICITY_THRESHOLD), || match score {
            Some(score) => format!("predicted non-pathogenic, score {score:?}"),
            None => "no pathogenicity prediction".to_string(),
        }))
    }
}

/// Off-target variants (intergenic, upstream) only pass inside a known regulatory region
pub struct RegulatoryFeatureFilter;

impl VariantFilter for RegulatoryFeatureFilter {
    fn kind(&self) -> StepKind {
        StepKind::RegulatoryFeatureFilter
    }

    fn messages(&self) -> Vec<String> {
        vec!["Removed intergenic and upstream variants outside regulatory regions".to_string()]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        Ok(FilterResult::check(!variant.effect.is_off_target() || variant.regulatory, || {
            format!("{} outside a regulatory region", variant.effect)
        }))
    }
}

/// Removes variants whose call-set FILTER was not PASS
pub struct FailedVariantFilter;

impl VariantFilter for FailedVariantFilter {
    fn kind(&self) -> StepKind {
        StepKind::FailedVariantFilter
    }

    fn messages(&self) -> Vec<String> {
        vec!["Removed variants failing the variant caller's filters".to_string()]
    }

    fn apply(&self, variant: &Variant) -> Result<FilterResult, StepError> {
        Ok(FilterResult::check(variant.passed_call_filters, || "FILTER is not PASS".to_string()))
    }
}

pub struct InheritanceFilter {
    modes: BTreeSet<SubModeOfInheritance>,
}

impl InheritanceFilter {
    pub fn new<'a>(modes: impl IntoIterator<Item = &'a SubModeOfInheritance>) -> Self {
        InheritanceFilter { modes: modes.into_iter().copied().collect() }
    }
}

impl GeneFilter for InheritanceFilter {
    fn kind(&self) -> StepKind {
        StepKind::InheritanceFilter
    }

    fn messages(&self) -> Vec<String> {
        match self.modes.is_empty() {
            true => vec!["No inheritance modes defined, all genes pass".to_string()],
            false => {
                let modes: Vec<&str> = self.modes.iter().map(SubModeOfInheritance::as_str).collect();
                vec![format!("Genes compatible with: {}", modes.join(", "))]
            }
        }
    }

    fn apply(&self, gene: &Gene) -> Result<FilterResult, StepError> {
        if self.modes.is_empty() {
            return Ok(FilterResult::pass());
        }
        let compatible = gene.compatible_modes.iter().any(|mode| self.modes.contains(mode));
        Ok(FilterResult::check(compatible, || {
            format!("{} is not compatible with any requested inheritance mode", gene.symbol)
        }))
    }
}

/// A gene without a score of the given type fails
pub struct PriorityScoreFilter {
    priority_type: PriorityType,
    min_priority_score: f32,
}

impl PriorityScoreFilter {
    pub fn new(priority_type: PriorityType, min_priority_score: f32) -> Self {
        PriorityScoreFilter { priority_type, min_priority_score }
    }
}

impl GeneFilter for PriorityScoreFilter {
    fn kind(&self) -> StepKind {
        StepKind::PriorityScoreFilter
    }

    fn messages(&self) -> Vec<String> {
        vec![format!("{} score >= {:?}", self.priority_type, self.min_priority_score)]
    }

    fn apply(&self, gene: &Gene) -> Result<FilterResult, StepError> {
        let min = f64::from(self.min_priority_score);
        Ok(match gene.score_for(self.priority_type) {
            Some(score) if score >= min => FilterResult::pass(),
            Some(score) => FilterResult::fail(format!("{} score {score:?} is below {min:?}", self.priority_type)),
            None => FilterResult::fail(format!("no {} score", self.priority_type)),
        })
    }
}
