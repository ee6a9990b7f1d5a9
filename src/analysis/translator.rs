//! Maps a job document onto calls against [`PipelineBuilder`]
//!
//! A job names its sample one of several ways and either spells out an analysis or picks a
//! preset. [`JobSpec`] settles both choices up front, so the translator only has to match on it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use log::{debug, info};

use crate::analysis::builder::PipelineBuilder;
use crate::analysis::catalog::PriorityType;
use crate::analysis::options::{HiPhiveOptions, OptionResolver};
use crate::analysis::preset::Preset;
use crate::analysis::settings::{AnalysisMode, InheritanceModeOptions};
use crate::analysis::step::{IntervalSource, PipelineSpec};
use crate::error::BuildError;
use crate::model::assembly::GenomeAssembly;
use crate::model::effect::VariantEffect;
use crate::model::inheritance::SubModeOfInheritance;
use crate::model::interval::GeneticInterval;
use crate::model::named::UnknownName;
use crate::request::job::{
    AnalysisDoc, AnalysisStep, FamilyDoc, IntervalFilterDoc, JobDocument, PhenopacketDoc, PriorityScoreFilterDoc,
    SampleDoc,
};
use crate::sample::Sample;
use crate::service::{IdentityOntology, OntologyService};

/// Where a job's sample comes from, in the order they are looked for
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSource {
    Sample(SampleDoc),
    Phenopacket(PhenopacketDoc),
    Family(FamilyDoc),
    /// the legacy sample fields written inside an analysis
    Analysis(SampleDoc),
}

impl SampleSource {
    pub fn to_sample(&self) -> Result<Sample, BuildError> {
        match self {
            SampleSource::Sample(doc) | SampleSource::Analysis(doc) => Sample::from_sample(doc),
            SampleSource::Phenopacket(doc) => Sample::from_phenopacket(doc),
            SampleSource::Family(doc) => Sample::from_family(doc),
        }
    }
}

/// A job whose shape has been decided: an explicit analysis, or a preset
#[derive(Debug, Clone, PartialEq)]
pub enum JobSpec {
    Analysis { sample: SampleSource, analysis: AnalysisDoc },
    Preset { sample: SampleSource, preset: Preset },
}

impl JobSpec {
    pub fn sample_source(&self) -> &SampleSource {
        match self {
            JobSpec::Analysis { sample, .. } | JobSpec::Preset { sample, .. } => sample,
        }
    }
}

impl TryFrom<JobDocument> for JobSpec {
    type Error = BuildError;

    /// An explicit analysis always wins over the default preset. Naming any other preset
    /// alongside an analysis is ambiguous.
    fn try_from(job: JobDocument) -> Result<Self, Self::Error> {
        let JobDocument { sample, phenopacket, family, analysis, preset } = job;
        let embedded = analysis
            .as_ref()
            .filter(|analysis| analysis.has_sample_fields())
            .map(AnalysisDoc::embedded_sample);

        let sample = match (sample, phenopacket, family, embedded) {
            (Some(sample), _, _, _) => SampleSource::Sample(sample),
            (None, Some(phenopacket), _, _) => SampleSource::Phenopacket(phenopacket),
            (None, None, Some(family), _) => SampleSource::Family(family),
            (None, None, None, Some(embedded)) => SampleSource::Analysis(embedded),
            (None, None, None, None) => return Err(BuildError::NoSampleDefined),
        };

        match analysis {
            Some(analysis) => match preset.as_deref().map(|name| Preset::from_name(Some(name))) {
                Some(preset) if preset != Preset::Exome => {
                    Err(BuildError::AmbiguousJobShape { preset: preset.name().to_string() })
                }
                _ => Ok(JobSpec::Analysis { sample, analysis }),
            },
            None => Ok(JobSpec::Preset { sample, preset: Preset::from_name(preset.as_deref()) }),
        }
    }
}

pub struct JobTranslator {
    ontology: Arc<dyn OntologyService>,
    supported_assemblies: BTreeSet<GenomeAssembly>,
}

impl Default for JobTranslator {
    fn default() -> Self {
        JobTranslator::new(Arc::new(IdentityOntology), GenomeAssembly::ALL.iter().copied().collect())
    }
}

impl JobTranslator {
    pub fn new(ontology: Arc<dyn OntologyService>, supported_assemblies: BTreeSet<GenomeAssembly>) -> Self {
        JobTranslator { ontology, supported_assemblies }
    }

    /// Build the pipeline a job describes. Presets come from the shared cache.
    pub fn translate(&self, job: &JobSpec) -> Result<Arc<PipelineSpec>, BuildError> {
        job.sample_source().to_sample()?;
        match job {
            JobSpec::Analysis { analysis, .. } => {
                info!("Translating analysis with {} steps", analysis.steps.len());
                translate_analysis(analysis).map(Arc::new)
            }
            JobSpec::Preset { preset, .. } => {
                info!("Using {} preset", preset.name());
                preset.pipeline()
            }
        }
    }

    pub fn translate_document(&self, job: JobDocument) -> Result<(JobSpec, Arc<PipelineSpec>), BuildError> {
        let job = JobSpec::try_from(job)?;
        let pipeline = self.translate(&job)?;
        Ok((job, pipeline))
    }

    /// The job's sample, checked against the supported assemblies and with current phenotype ids
    pub fn parse_sample(&self, job: &JobSpec) -> Result<Sample, BuildError> {
        let sample = job.sample_source().to_sample()?;
        if !self.supported_assemblies.contains(&sample.genome_assembly) {
            return Err(BuildError::UnsupportedAssembly {
                assembly: sample.genome_assembly.to_string(),
                supported: self
                    .supported_assemblies
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        let current = self.ontology.current_hpo_ids(&sample.hpo_ids);
        match current == sample.hpo_ids {
            true => Ok(sample),
            false => {
                info!("Updated phenotype terms {:?} to current ids {:?}", sample.hpo_ids, current);
                Ok(Sample { hpo_ids: current, ..sample })
            }
        }
    }
}

pub fn translate_analysis(analysis: &AnalysisDoc) -> Result<PipelineSpec, BuildError> {
    let mut builder = PipelineBuilder::new()
        .analysis_mode(parse_analysis_mode(analysis.analysis_mode.as_deref())?)
        .inheritance_modes(parse_inheritance_modes(&analysis.inheritance_modes)?)
        .frequency_sources(parse_names(&analysis.frequency_sources, unknown_source("frequency"))?)
        .pathogenicity_sources(parse_names(&analysis.pathogenicity_sources, unknown_source("pathogenicity"))?);
    for step in &analysis.steps {
        builder = add_step(builder, step)?;
    }
    builder.build()
}

fn add_step(builder: PipelineBuilder, step: &AnalysisStep) -> Result<PipelineBuilder, BuildError> {
    let resolver = OptionResolver::new(builder.settings());
    match step {
        AnalysisStep::IntervalFilter(doc) => {
            let intervals = parse_interval_source(doc)?;
            builder.add_interval_filter(intervals)
        }
        AnalysisStep::GenePanelFilter(doc) => {
            let symbols = doc.gene_symbols.iter().map(|s| s.trim()).filter(|s| !s.is_empty());
            builder.add_gene_panel_filter(symbols)
        }
        AnalysisStep::VariantEffectFilter(doc) => {
            let remove: BTreeSet<VariantEffect> = parse_names(&doc.remove, |err| BuildError::UnknownVariantEffect {
                name: err.name,
                permitted: err.permitted.join(", "),
            })?;
            builder.add_variant_effect_filter(remove)
        }
        AnalysisStep::QualityFilter(doc) => {
            let min_quality = resolver.min_quality(doc.min_quality)?;
            builder.add_quality_filter(min_quality)
        }
        AnalysisStep::KnownVariantFilter(_) => builder.add_known_variant_filter(),
        AnalysisStep::FrequencyFilter(doc) => builder.add_frequency_filter(doc.max_frequency),
        AnalysisStep::PathogenicityFilter(doc) => {
            let keep_non_pathogenic = resolver.keep_non_pathogenic(doc.keep_non_pathogenic);
            builder.add_pathogenicity_filter(keep_non_pathogenic)
        }
        AnalysisStep::InheritanceFilter(_) => builder.add_inheritance_filter(),
        AnalysisStep::PriorityScoreFilter(doc) => {
            let (priority_type, min_priority_score) = parse_priority_score(doc, &resolver)?;
            builder.add_priority_score_filter(priority_type, min_priority_score)
        }
        AnalysisStep::RegulatoryFeatureFilter(_) => builder.add_regulatory_feature_filter(),
        AnalysisStep::FailedVariantFilter(_) => builder.add_failed_variant_filter(),
        AnalysisStep::OmimPrioritiser(_) => builder.add_omim_prioritiser(),
        AnalysisStep::HiPhivePrioritiser(doc) => {
            let options = HiPhiveOptions::parse(
                doc.disease_id.as_deref(),
                doc.candidate_gene_symbol.as_deref(),
                doc.run_params.as_deref(),
            )?;
            builder.add_hiphive_prioritiser(options)
        }
        AnalysisStep::PhivePrioritiser(_) => builder.add_phive_prioritiser(),
        AnalysisStep::PhenixPrioritiser(_) => builder.add_phenix_prioritiser(),
    }
}

fn parse_analysis_mode(mode: Option<&str>) -> Result<AnalysisMode, BuildError> {
    match mode {
        None => Ok(AnalysisMode::PassOnly),
        Some(mode) => mode.parse().map_err(|err: UnknownName| BuildError::UnknownAnalysisMode {
            name: err.name,
            permitted: err.permitted.join(", "),
        }),
    }
}

/// No entries means no inheritance-aware defaulting
fn parse_inheritance_modes(modes: &BTreeMap<String, f32>) -> Result<InheritanceModeOptions, BuildError> {
    let mut cutoffs = BTreeMap::new();
    for (name, cutoff) in modes {
        let mode: SubModeOfInheritance = name.parse().map_err(|err: UnknownName| BuildError::UnknownInheritanceMode {
            name: err.name,
            permitted: err.permitted.join(", "),
        })?;
        cutoffs.insert(mode, *cutoff);
    }
    debug!("Inheritance mode cutoffs {cutoffs:?}");
    InheritanceModeOptions::of(cutoffs)
}

fn unknown_source(kind: &'static str) -> impl Fn(UnknownName) -> BuildError {
    move |err| BuildError::UnknownSource { kind, name: err.name, permitted: err.permitted.join(", ") }
}

fn parse_names<T, E>(names: &[String], on_unknown: E) -> Result<BTreeSet<T>, BuildError>
where
    T: std::str::FromStr<Err = UnknownName> + Ord,
    E: Fn(UnknownName) -> BuildError,
{
    names.iter().map(|name| name.trim().parse::<T>().map_err(&on_unknown)).collect()
}

/// The first of interval, intervals and bed that was supplied
fn parse_interval_source(doc: &IntervalFilterDoc) -> Result<IntervalSource, BuildError> {
    let parse = |text: &str| {
        text.parse::<GeneticInterval>()
            .map_err(|reason| BuildError::InvalidInterval { interval: text.to_string(), reason })
    };
    if let Some(interval) = doc.interval.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        return Ok(IntervalSource::Single(parse(interval)?));
    }
    if !doc.intervals.is_empty() {
        let intervals = doc.intervals.iter().map(|i| parse(i.trim())).collect::<Result<Vec<_>, _>>()?;
        return Ok(IntervalSource::List(intervals));
    }
    match doc.bed.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(bed) => Ok(IntervalSource::Bed(bed.into())),
        None => Err(BuildError::MissingIntervalSpec),
    }
}

fn parse_priority_score(
    doc: &PriorityScoreFilterDoc,
    resolver: &OptionResolver,
) -> Result<(PriorityType, f32), BuildError> {
    let name = doc
        .priority_type
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(BuildError::MissingPriorityType)?;
    let priority_type: PriorityType = name.parse().map_err(|err: UnknownName| BuildError::UnknownPriorityType {
        name: err.name,
        permitted: err.permitted.join(", "),
    })?;
    let min_priority_score = resolver.min_priority_score(doc.min_priority_score)?;
    Ok((priority_type, min_priority_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::StepKind;
    use crate::analysis::step::StepSpec;
    use crate::request::job::{FrequencyFilterDoc, NoOptions, SubjectDoc};
    use crate::service::TermMapOntology;

    fn sample() -> SampleDoc {
        SampleDoc { vcf: Some("/data/proband.vcf.gz".to_string()), ..Default::default() }
    }

    fn analysis(steps: Vec<AnalysisStep>) -> AnalysisDoc {
        AnalysisDoc { frequency_sources: vec!["THOUSAND_GENOMES".to_string()], steps, ..Default::default() }
    }

    #[test]
    fn sample_wins_over_other_representations() {
        let job = JobDocument {
            sample: Some(sample()),
            phenopacket: Some(PhenopacketDoc::default()),
            ..Default::default()
        };
        let spec = JobSpec::try_from(job).unwrap();
        assert!(matches!(spec.sample_source(), SampleSource::Sample(_)));
        assert!(matches!(spec, JobSpec::Preset { preset: Preset::Exome, .. }));
    }

    #[test]
    fn analysis_fields_are_the_last_resort() {
        let job = JobDocument {
            analysis: Some(AnalysisDoc { vcf: Some("/data/proband.vcf.gz".to_string()), ..Default::default() }),
            ..Default::default()
        };
        let spec = JobSpec::try_from(job).unwrap();
        assert!(matches!(spec.sample_source(), SampleSource::Analysis(_)));

        let no_sample = JobDocument { analysis: Some(AnalysisDoc::default()), ..Default::default() };
        assert_eq!(JobSpec::try_from(no_sample), Err(BuildError::NoSampleDefined));
        assert_eq!(JobSpec::try_from(JobDocument::default()), Err(BuildError::NoSampleDefined));
    }

    #[test]
    fn analysis_beats_default_preset() {
        let job = JobDocument {
            sample: Some(sample()),
            analysis: Some(analysis(vec![])),
            preset: Some("exome".to_string()),
            ..Default::default()
        };
        assert!(matches!(JobSpec::try_from(job.clone()), Ok(JobSpec::Analysis { .. })));

        let genome = JobDocument { preset: Some("genome".to_string()), ..job };
        assert_eq!(
            JobSpec::try_from(genome),
            Err(BuildError::AmbiguousJobShape { preset: "genome".to_string() })
        );
    }

    #[test]
    fn family_without_proband_is_unsupported() {
        let job = JobDocument { family: Some(FamilyDoc::default()), ..Default::default() };
        let spec = JobSpec::try_from(job).unwrap();
        let err = JobTranslator::default().translate(&spec).unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedSampleShape { .. }));
    }

    #[test]
    fn steps_keep_their_order() {
        let pipeline = translate_analysis(&analysis(vec![
            AnalysisStep::FrequencyFilter(FrequencyFilterDoc { max_frequency: Some(1.0) }),
            AnalysisStep::FailedVariantFilter(NoOptions {}),
            AnalysisStep::KnownVariantFilter(NoOptions {}),
        ]))
        .unwrap();
        assert_eq!(
            pipeline.kinds(),
            vec![StepKind::FrequencyFilter, StepKind::FailedVariantFilter, StepKind::KnownVariantFilter]
        );
        assert_eq!(pipeline.settings().analysis_mode, AnalysisMode::PassOnly);
    }

    #[test]
    fn unknown_source_lists_permitted_values() {
        let doc = AnalysisDoc { frequency_sources: vec!["GNOMAD_Z".to_string()], ..Default::default() };
        match translate_analysis(&doc).unwrap_err() {
            BuildError::UnknownSource { kind, name, permitted } => {
                assert_eq!(kind, "frequency");
                assert_eq!(name, "GNOMAD_Z");
                assert!(permitted.contains("THOUSAND_GENOMES"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn interval_filter_sources() {
        let single = IntervalFilterDoc { interval: Some("chr10:122892600-122892700".to_string()), ..Default::default() };
        assert_eq!(
            parse_interval_source(&single),
            Ok(IntervalSource::Single(GeneticInterval::new("10", 122892600, 122892700).unwrap()))
        );
        let bed = IntervalFilterDoc { bed: Some("/data/regions.bed".to_string()), ..Default::default() };
        assert_eq!(parse_interval_source(&bed), Ok(IntervalSource::Bed("/data/regions.bed".into())));
        assert_eq!(parse_interval_source(&IntervalFilterDoc::default()), Err(BuildError::MissingIntervalSpec));
        let bad = IntervalFilterDoc { interval: Some("chr10:200-100".to_string()), ..Default::default() };
        assert!(matches!(parse_interval_source(&bad), Err(BuildError::InvalidInterval { .. })));
    }

    #[test]
    fn priority_score_filter_needs_type_and_score() {
        let hiphive = AnalysisStep::HiPhivePrioritiser(Default::default());
        let missing_type = analysis(vec![
            hiphive.clone(),
            AnalysisStep::PriorityScoreFilter(PriorityScoreFilterDoc { priority_type: None, min_priority_score: Some(0.5) }),
        ]);
        assert_eq!(translate_analysis(&missing_type), Err(BuildError::MissingPriorityType));

        let missing_score = analysis(vec![
            hiphive.clone(),
            AnalysisStep::PriorityScoreFilter(PriorityScoreFilterDoc {
                priority_type: Some("HIPHIVE_PRIORITY".to_string()),
                min_priority_score: None,
            }),
        ]);
        assert_eq!(translate_analysis(&missing_score), Err(BuildError::MissingMinScore));

        let ok = analysis(vec![
            hiphive,
            AnalysisStep::PriorityScoreFilter(PriorityScoreFilterDoc {
                priority_type: Some("HIPHIVE_PRIORITY".to_string()),
                min_priority_score: Some(0.0),
            }),
        ]);
        assert_eq!(
            translate_analysis(&ok).unwrap().steps()[1],
            StepSpec::PriorityScoreFilter { priority_type: PriorityType::HiphivePriority, min_priority_score: 0.0 }
        );
    }

    #[test]
    fn parse_sample_checks_assembly_and_updates_terms() {
        let job = JobSpec::Preset {
            sample: SampleSource::Sample(SampleDoc {
                genome_assembly: Some("hg38".to_string()),
                hpo_ids: vec!["HP:0000001".to_string()],
                ..sample()
            }),
            preset: Preset::Exome,
        };
        let hg19_only = JobTranslator::new(Arc::new(IdentityOntology), BTreeSet::from([GenomeAssembly::Hg19]));
        assert_eq!(
            hg19_only.parse_sample(&job),
            Err(BuildError::UnsupportedAssembly { assembly: "hg38".to_string(), supported: "hg19".to_string() })
        );

        let ontology = TermMapOntology::new(BTreeMap::from([("HP:0000001".to_string(), "HP:0001156".to_string())]));
        let translator = JobTranslator::new(Arc::new(ontology), GenomeAssembly::ALL.iter().copied().collect());
        let parsed = translator.parse_sample(&job).unwrap();
        assert_eq!(parsed.hpo_ids, vec!["HP:0001156".to_string()]);
        assert_eq!(parsed.genome_assembly, GenomeAssembly::Hg38);
    }

    #[test]
    fn phenopacket_subject_becomes_proband() {
        let job = JobSpec::Preset {
            sample: SampleSource::Phenopacket(PhenopacketDoc {
                subject: Some(SubjectDoc { id: "manuel".to_string(), sex: None }),
                ..Default::default()
            }),
            preset: Preset::Exome,
        };
        let sample = JobTranslator::default().parse_sample(&job).unwrap();
        assert_eq!(sample.proband_id.as_deref(), Some("manuel"));
    }
}
