//! Error types for job reading, pipeline construction and step execution
//!
//! Build-time errors are fatal to a job: nothing is executed once one is raised. Run-time errors
//! from collaborators are scoped to a single step (see [`StepError`]) unless the step is fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a job description into a runnable pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Unsupported sample type: {reason}. Only a sample, family or phenopacket with a proband is currently supported")]
    UnsupportedSampleShape { reason: String },

    #[error("No sample defined. Supply one of sample, phenopacket or family, or an analysis containing e.g. {{vcf: /data/sample.vcf.gz, genomeAssembly: hg38}}")]
    NoSampleDefined,

    #[error("Job supplies both an analysis and the '{preset}' preset. Use either {{analysis: {{steps: [...]}}}} or {{preset: {preset}}}")]
    AmbiguousJobShape { preset: String },

    #[error("Unknown {kind} source '{name}'. Permitted sources are any of: {permitted}")]
    UnknownSource {
        kind: &'static str,
        name: String,
        permitted: String,
    },

    #[error("Illegal VariantEffect: '{name}'. Permitted effects are any of: {permitted}")]
    UnknownVariantEffect { name: String, permitted: String },

    #[error("Unknown analysisMode '{name}'. Permitted modes are any of: {permitted} e.g. {{analysisMode: PASS_ONLY}}")]
    UnknownAnalysisMode { name: String, permitted: String },

    #[error("Unknown inheritance mode '{name}'. Permitted modes are any of: {permitted}")]
    UnknownInheritanceMode { name: String, permitted: String },

    #[error("Unknown priority type '{name}'. Permitted types are any of: {permitted}")]
    UnknownPriorityType { name: String, permitted: String },

    #[error("Unknown hiPhivePrioritiser runParams value '{name}'. Permitted values are any of: {permitted} e.g. {{runParams: 'human,mouse,fish,ppi'}}")]
    UnknownHiPhiveRunParam { name: String, permitted: String },

    #[error("Assembly {assembly} not supported in this instance. Supported assemblies are: {supported}")]
    UnsupportedAssembly { assembly: String, supported: String },

    #[error("Interval filter requires a valid genetic interval e.g. {{interval: 'chr10:122892600-122892700'}} or bed file path {{bed: /data/intervals.bed}}")]
    MissingIntervalSpec,

    #[error("Interval filter could not parse '{interval}': {reason}. Expected e.g. {{interval: 'chr10:122892600-122892700'}}")]
    InvalidInterval { interval: String, reason: String },

    #[error("Gene panel filter requires a list of HGNC gene symbols e.g. {{geneSymbols: [FGFR1, FGFR2]}}")]
    EmptyGenePanel,

    #[error("VariantEffect filter requires a list of VariantEffects to be removed e.g. {{remove: [UPSTREAM_GENE_VARIANT, INTERGENIC_VARIANT, SYNONYMOUS_VARIANT]}}")]
    EmptyEffectList,

    #[error("Quality filter requires a floating point value for the minimum PHRED score e.g. {{minQuality: 50.0}}")]
    MissingQualityThreshold,

    #[error("{step} requires a list of frequency sources for the analysis e.g. frequencySources: [THOUSAND_GENOMES, ESP_ALL]")]
    MissingFrequencySources { step: &'static str },

    #[error("Frequency filter requires a floating point value for the maximum frequency e.g. {{maxFrequency: 2.0}} if inheritanceModes have not been defined")]
    MissingMaxFrequency,

    #[error("Frequency filter maxFrequency must be a percentage between 0 and 100, got {value} e.g. {{maxFrequency: 2.0}}")]
    InvalidFrequency { value: f32 },

    #[error("Pathogenicity filter requires a list of pathogenicity sources for the analysis e.g. {{pathogenicitySources: [REVEL, MVP]}}")]
    MissingPathogenicitySources,

    #[error("Priority score filter requires a string value for the prioritiser type e.g. {{priorityType: HIPHIVE_PRIORITY}}")]
    MissingPriorityType,

    #[error("Priority score filter requires a non-negative floating point value for the minimum prioritiser score e.g. {{minPriorityScore: 0.65}}")]
    MissingMinScore,

    #[error("Priority score filter for {priority_type} requires a preceding prioritiser producing that score e.g. steps: [{{hiPhivePrioritiser: {{}}}}, {{priorityScoreFilter: {{priorityType: HIPHIVE_PRIORITY, minPriorityScore: 0.5}}}}]")]
    MissingPrioritiser { priority_type: String },

    #[error("Prioritiser {priority_type} has already been added to this analysis. Each prioritiser may only be run once")]
    DuplicatePrioritiser { priority_type: String },

    #[error("Inheritance mode {mode} has an invalid frequency cutoff {value}. Cutoffs are non-negative percentages e.g. {{inheritanceModes: {{AUTOSOMAL_DOMINANT: 0.1}}}}")]
    InvalidInheritanceCutoff { mode: String, value: f32 },
}

/// Problems reading a job document from disk before any translation happens
#[derive(Error, Debug)]
pub enum JobReadError {
    #[error("Can't read job at path {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job is not valid JSON or YAML: {0}")]
    Decode(String),

    #[error("Job schema failed to compile: {0}")]
    Schema(String),

    #[error("Job fails schema validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Job could not be deserialised: {0}")]
    Deserialisation(String),
}

/// A failure raised by a collaborator while a single step was running
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Reference data lookup failed: {0}")]
    Lookup(String),

    #[error("Could not read regions from {path}: {reason}")]
    Regions { path: PathBuf, reason: String },

    #[error("No {0} available for this step")]
    Unavailable(&'static str),
}

/// Failures that abort a whole run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Step {index} ({name}) failed and is fatal on error: {source}")]
    FatalStep {
        index: usize,
        name: String,
        #[source]
        source: StepError,
    },
}
