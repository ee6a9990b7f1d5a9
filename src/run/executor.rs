//! Runs a built pipeline against a working set of variants and genes
//!
//! Steps run strictly one after another. Within a step every variant (or gene) is judged
//! independently on the rayon pool, then the verdicts are recorded in input order so results do
//! not depend on which thread finished first.

use std::collections::{HashMap, HashSet};

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::catalog::{StepCategory, StepKind};
use crate::analysis::settings::AnalysisMode;
use crate::analysis::step::PipelineSpec;
use crate::error::{RunError, StepError};
use crate::model::gene::{Gene, PriorityScore};
use crate::model::variant::{FilterTriage, Variant};
use crate::model::WorkingSet;
use crate::run::factory::{StandardStepFactory, Step, StepFactory};
use crate::run::filter::{FilterResult, GeneFilter, VariantFilter};
use crate::run::prioritiser::Prioritiser;
use crate::run::report::{RunReport, StepResult};

/// The annotated working set after a run, with the report of every step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResults {
    pub genes: Vec<Gene>,
    /// In SPARSE mode this includes removed variants, flagged as such
    pub variants: Vec<Variant>,
    pub report: RunReport,
}

impl AnalysisResults {
    /// Variants which passed every filter that ran
    pub fn passing_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants
            .iter()
            .filter(|variant| !variant.is_removed() && variant.passed_filters())
    }

    /// Genes which passed every gene filter and still have a passing variant
    pub fn passing_genes(&self) -> impl Iterator<Item = &Gene> {
        let live = live_symbols(&self.variants);
        self.genes
            .iter()
            .filter(move |gene| gene.passed_filters() && live.contains(gene.symbol.as_str()))
    }
}

pub struct PipelineExecutor<F> {
    factory: F,
}

impl Default for PipelineExecutor<StandardStepFactory> {
    fn default() -> Self {
        PipelineExecutor::new(StandardStepFactory::default())
    }
}

impl<F: StepFactory> PipelineExecutor<F> {
    pub fn new(factory: F) -> Self {
        PipelineExecutor { factory }
    }

    pub fn execute(&self, spec: &PipelineSpec, working_set: WorkingSet) -> Result<AnalysisResults, RunError> {
        let mode = spec.settings().analysis_mode;
        let WorkingSet { mut genes, mut variants } = working_set;
        let total_variants = variants.len();
        let total_genes = genes.len();
        info!("Running {} steps over {total_variants} variants in {total_genes} genes ({mode})", spec.steps().len());

        let mut run = Run { index: 0, mode, removed: Vec::new() };
        let mut report = RunReport::new(mode);
        for (index, step_spec) in spec.steps().iter().enumerate() {
            run.index = index;
            let kind = step_spec.kind();
            let result = match self.factory.create(step_spec, spec.settings()) {
                Ok(Step::Variant(filter)) => run.variant_filter(filter.as_ref(), &mut genes, &mut variants)?,
                Ok(Step::Gene(filter)) => run.gene_filter(filter.as_ref(), &mut genes, &mut variants)?,
                Ok(Step::Prioritiser(prioritiser)) => run.prioritise(prioritiser.as_ref(), &mut genes, &variants)?,
                Err(err) if kind.is_fatal_on_error() => return Err(run.fatal(kind, err)),
                Err(err) => {
                    warn!("Skipping step {index} {}: {err}", kind.display_name());
                    let count = match kind.category() {
                        StepCategory::VariantFilter => count_passing_variants(&variants),
                        _ => count_passing_genes(&genes, &variants),
                    };
                    StepResult { index, kind, before: count, after: count, messages: vec![err.to_string()], skipped: true }
                }
            };
            info!("{index}. {}: {} -> {}", kind.display_name(), result.before, result.after);
            report.push(result);
        }

        report.total_variants = total_variants;
        report.passing_variants = count_passing_variants(&variants);
        report.total_genes = total_genes;
        report.passing_genes = count_passing_genes(&genes, &variants);

        if mode == AnalysisMode::Sparse {
            variants.append(&mut run.removed);
        }
        Ok(AnalysisResults { genes, variants, report })
    }
}

/// State carried between the steps of one execution
struct Run {
    index: usize,
    mode: AnalysisMode,
    /// variants dropped in SPARSE mode, returned at the end
    removed: Vec<Variant>,
}

impl Run {
    fn variant_filter(
        &mut self,
        filter: &dyn VariantFilter,
        genes: &mut Vec<Gene>,
        variants: &mut Vec<Variant>,
    ) -> Result<StepResult, RunError> {
        let before = count_passing_variants(variants);
        let outcomes: Vec<_> = variants.par_iter().map(|variant| filter.apply(variant)).collect();

        let mut messages = filter.messages();
        for (variant, outcome) in variants.iter_mut().zip(outcomes) {
            match outcome {
                Ok(result) => variant.add_triage(result.into_triage(self.index, filter.kind())),
                Err(err) => messages.push(self.item_error(filter.kind(), &variant_label(variant), err)?),
            }
        }
        self.remove_failed(genes, variants);

        Ok(StepResult {
            index: self.index,
            kind: filter.kind(),
            before,
            after: count_passing_variants(variants),
            messages,
            skipped: false,
        })
    }

    /// A gene's verdict is copied onto each of its variants. Variants naming no gene in the
    /// working set fail.
    fn gene_filter(
        &mut self,
        filter: &dyn GeneFilter,
        genes: &mut Vec<Gene>,
        variants: &mut Vec<Variant>,
    ) -> Result<StepResult, RunError> {
        let before = count_passing_genes(genes, variants);
        let outcomes: Vec<_> = genes.par_iter().map(|gene| filter.apply(gene)).collect();

        let mut messages = filter.messages();
        let mut verdicts: HashMap<String, FilterTriage> = HashMap::new();
        for (gene, outcome) in genes.iter_mut().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    let triage = result.into_triage(self.index, filter.kind());
                    verdicts.insert(gene.symbol.clone(), triage.clone());
                    gene.add_triage(triage);
                }
                Err(err) => messages.push(self.item_error(filter.kind(), &gene.symbol, err)?),
            }
        }
        let known: HashSet<&str> = genes.iter().map(|gene| gene.symbol.as_str()).collect();
        for variant in variants.iter_mut() {
            if let Some(triage) = verdicts.get(&variant.gene_symbol) {
                variant.add_triage(triage.clone());
            } else if !known.contains(variant.gene_symbol.as_str()) {
                let orphan = FilterResult::fail(format!("no gene '{}' in the working set", variant.gene_symbol));
                variant.add_triage(orphan.into_triage(self.index, filter.kind()));
            }
        }
        self.remove_failed(genes, variants);

        Ok(StepResult {
            index: self.index,
            kind: filter.kind(),
            before,
            after: count_passing_genes(genes, variants),
            messages,
            skipped: false,
        })
    }

    /// Scores are stored per step and type, never combined here
    fn prioritise(
        &mut self,
        prioritiser: &dyn Prioritiser,
        genes: &mut [Gene],
        variants: &[Variant],
    ) -> Result<StepResult, RunError> {
        let before = count_passing_genes(genes, variants);
        let outcomes: Vec<_> = genes.par_iter().map(|gene| prioritiser.score(gene)).collect();

        let mut messages = prioritiser.messages();
        for (gene, outcome) in genes.iter_mut().zip(outcomes) {
            match outcome {
                Ok(result) => gene.add_score(PriorityScore {
                    step: self.index,
                    priority_type: prioritiser.priority_type(),
                    score: result.score,
                    explanation: result.explanation,
                }),
                Err(err) => messages.push(self.item_error(prioritiser.kind(), &gene.symbol, err)?),
            }
        }

        Ok(StepResult {
            index: self.index,
            kind: prioritiser.kind(),
            before,
            after: count_passing_genes(genes, variants),
            messages,
            skipped: false,
        })
    }

    /// Drop failed variants, then genes left without any variant. FULL mode keeps everything.
    fn remove_failed(&mut self, genes: &mut Vec<Gene>, variants: &mut Vec<Variant>) {
        if !self.mode.removes_failed() {
            return;
        }
        let (kept, failed): (Vec<Variant>, Vec<Variant>) = variants.drain(..).partition(Variant::passed_filters);
        *variants = kept;
        if self.mode == AnalysisMode::Sparse {
            self.removed.extend(failed.into_iter().map(|mut variant| {
                variant.mark_removed();
                variant
            }));
        }
        let live = live_symbols(variants);
        genes.retain(|gene| gene.passed_filters() && live.contains(gene.symbol.as_str()));
    }

    /// A failing item is left unannotated and the failure becomes a step message
    fn item_error(&self, kind: StepKind, item: &str, err: StepError) -> Result<String, RunError> {
        if kind.is_fatal_on_error() {
            return Err(self.fatal(kind, err));
        }
        warn!("{} could not judge {item}: {err}", kind.display_name());
        Ok(format!("{item}: {err}"))
    }

    fn fatal(&self, kind: StepKind, source: StepError) -> RunError {
        RunError::FatalStep { index: self.index, name: kind.display_name().to_string(), source }
    }
}

fn variant_label(variant: &Variant) -> String {
    format!("{}:{} {}>{}", variant.chromosome, variant.position, variant.reference, variant.alternate)
}

fn count_passing_variants(variants: &[Variant]) -> usize {
    variants.iter().filter(|variant| variant.passed_filters()).count()
}

/// Symbols of genes with at least one variant still passing
fn live_symbols(variants: &[Variant]) -> HashSet<&str> {
    variants
        .iter()
        .filter(|variant| !variant.is_removed() && variant.passed_filters())
        .map(|variant| variant.gene_symbol.as_str())
        .collect()
}

fn count_passing_genes(genes: &[Gene], variants: &[Variant]) -> usize {
    let live = live_symbols(variants);
    genes
        .iter()
        .filter(|gene| gene.passed_filters() && live.contains(gene.symbol.as_str()))
        .count()
}
