//! Integration tests for reading and translating jobs
//!
//! Jobs go through the same path as the binary: schema validation, shape resolution, then the
//! pipeline builder.

use std::io::Write;

use rstest::rstest;
use varsift::analysis::catalog::StepKind;
use varsift::analysis::preset::Preset;
use varsift::analysis::step::StepSpec;
use varsift::analysis::translator::{JobSpec, JobTranslator};
use varsift::error::BuildError;
use varsift::request::job::JobDocument;
use varsift::request::message::{read_str, JobMessage};
use varsift::request::schema::load_schema;

fn read_yaml(yaml: &str) -> JobDocument {
    let schema = load_schema().unwrap();
    read_str(&schema, yaml, true).unwrap()
}

fn translate_yaml(yaml: &str) -> Result<StepsAndJob, BuildError> {
    let translator = JobTranslator::default();
    translator
        .translate_document(read_yaml(yaml))
        .map(|(job, pipeline)| StepsAndJob { job, steps: pipeline.steps().to_vec() })
}

struct StepsAndJob {
    job: JobSpec,
    steps: Vec<StepSpec>,
}

const EXPLICIT_JOB: &str = r#"
sample:
  genomeAssembly: hg38
  vcf: /data/Pfeiffer.vcf.gz
  hpoIds: ['HP:0001156', 'HP:0001363', 'HP:0011304']
analysis:
  analysisMode: PASS_ONLY
  inheritanceModes:
    AUTOSOMAL_DOMINANT: 0.1
    AUTOSOMAL_RECESSIVE_HOM_ALT: 0.1
  frequencySources: [THOUSAND_GENOMES, GNOMAD_E_AFR]
  pathogenicitySources: [REVEL, MVP]
  steps:
    - intervalFilter: {interval: 'chr10:123256200-123256300'}
    - geneBlacklistFilter: {}
"#;

#[test]
fn unknown_step_fails_schema_validation() {
    let schema = load_schema().unwrap();
    assert!(read_str(&schema, EXPLICIT_JOB, true).is_err());
}

#[test]
fn yaml_job_from_disk_translates_in_order() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
sample:
  vcf: /data/Pfeiffer.vcf.gz
  hpoIds: ['HP:0001156']
analysis:
  inheritanceModes: {{AUTOSOMAL_DOMINANT: 0.1, AUTOSOMAL_RECESSIVE_HOM_ALT: 0.1}}
  frequencySources: [THOUSAND_GENOMES, GNOMAD_E_AFR]
  pathogenicitySources: [REVEL, MVP]
  steps:
    - failedVariantFilter: {{}}
    - qualityFilter: {{minQuality: 50.0}}
    - frequencyFilter: {{}}
    - pathogenicityFilter: {{keepNonPathogenic: true}}
    - inheritanceFilter: {{}}
    - omimPrioritiser: {{}}
    - hiPhivePrioritiser: {{runParams: 'human,mouse'}}
    - priorityScoreFilter: {{priorityType: HIPHIVE_PRIORITY, minPriorityScore: 0.5}}
"#
    )
    .unwrap();
    let message = JobMessage { path: file.path().to_path_buf(), compiled_schema: load_schema().unwrap() };
    let (_, pipeline) = JobTranslator::default().translate_document(message.read().unwrap()).unwrap();

    assert_eq!(
        pipeline.kinds(),
        vec![
            StepKind::FailedVariantFilter,
            StepKind::QualityFilter,
            StepKind::FrequencyFilter,
            StepKind::PathogenicityFilter,
            StepKind::InheritanceFilter,
            StepKind::OmimPrioritiser,
            StepKind::HiPhivePrioritiser,
            StepKind::PriorityScoreFilter,
        ]
    );
    assert_eq!(pipeline.steps()[2], StepSpec::FrequencyFilter { max_frequency: 0.1 });
}

#[rstest]
#[case::table_maximum("{AUTOSOMAL_DOMINANT: 0.1, AUTOSOMAL_RECESSIVE_HOM_ALT: 0.1}", Ok(0.1))]
#[case::mixed_table("{AUTOSOMAL_DOMINANT: 0.1, AUTOSOMAL_RECESSIVE_COMP_HET: 2.0}", Ok(2.0))]
#[case::no_table("{}", Err(BuildError::MissingMaxFrequency))]
fn frequency_threshold_defaults(#[case] inheritance_modes: &str, #[case] expected: Result<f32, BuildError>) {
    let yaml = format!(
        "sample: {{vcf: /data/sample.vcf}}\nanalysis:\n  frequencySources: [THOUSAND_GENOMES]\n  inheritanceModes: {inheritance_modes}\n  steps:\n    - frequencyFilter: {{}}\n"
    );
    let result = translate_yaml(&yaml).map(|translated| match translated.steps[0] {
        StepSpec::FrequencyFilter { max_frequency } => max_frequency,
        ref other => panic!("unexpected step {other:?}"),
    });
    assert_eq!(result, expected);
}

#[rstest]
#[case::known_variant("knownVariantFilter: {}")]
#[case::frequency("frequencyFilter: {maxFrequency: 1.0}")]
#[case::frequency_from_table("frequencyFilter: {}")]
fn frequency_steps_need_sources(#[case] step: &str) {
    let yaml = format!(
        "sample: {{vcf: /data/sample.vcf}}\nanalysis:\n  inheritanceModes: {{AUTOSOMAL_DOMINANT: 0.1}}\n  steps:\n    - {step}\n"
    );
    assert!(matches!(translate_yaml(&yaml), Err(BuildError::MissingFrequencySources { .. })));
}

#[rstest]
#[case::quality("qualityFilter: {}", BuildError::MissingQualityThreshold)]
#[case::gene_panel("genePanelFilter: {geneSymbols: []}", BuildError::EmptyGenePanel)]
#[case::effects("variantEffectFilter: {remove: []}", BuildError::EmptyEffectList)]
#[case::interval("intervalFilter: {}", BuildError::MissingIntervalSpec)]
#[case::pathogenicity("pathogenicityFilter: {}", BuildError::MissingPathogenicitySources)]
fn steps_missing_parameters_fail(#[case] step: &str, #[case] expected: BuildError) {
    let yaml = format!("sample: {{vcf: /data/sample.vcf}}\nanalysis:\n  steps:\n    - {step}\n");
    assert_eq!(translate_yaml(&yaml).err(), Some(expected));
}

#[test]
fn explicit_zero_quality_is_a_threshold() {
    let yaml = "sample: {vcf: /data/sample.vcf}\nanalysis:\n  steps:\n    - qualityFilter: {minQuality: 0.0}\n";
    let translated = translate_yaml(yaml).unwrap();
    assert_eq!(translated.steps, vec![StepSpec::QualityFilter { min_quality: 0.0 }]);
}

#[test]
fn unknown_effect_lists_every_effect() {
    let yaml = "sample: {vcf: /data/sample.vcf}\nanalysis:\n  steps:\n    - variantEffectFilter: {remove: [SYNONYMOUS_VARIANT, NOT_AN_EFFECT]}\n";
    match translate_yaml(yaml).err() {
        Some(BuildError::UnknownVariantEffect { name, permitted }) => {
            assert_eq!(name, "NOT_AN_EFFECT");
            assert!(permitted.contains("SYNONYMOUS_VARIANT"));
            assert!(permitted.contains("INTERGENIC_VARIANT"));
        }
        Some(other) => panic!("unexpected error {other}"),
        None => panic!("unknown effect was accepted"),
    }
}

#[test]
fn translation_is_deterministic() {
    let yaml = "sample: {vcf: /data/sample.vcf}\nanalysis:\n  frequencySources: [ESP_ALL]\n  steps:\n    - genePanelFilter: {geneSymbols: [FGFR2, FGFR1, FGFR2]}\n    - knownVariantFilter: {}\n";
    let first = translate_yaml(yaml).unwrap();
    let second = translate_yaml(yaml).unwrap();
    assert_eq!(first.steps, second.steps);
    assert_eq!(first.job, second.job);
}

#[rstest]
#[case::unspecified("", Preset::Exome)]
#[case::exome("preset: exome\n", Preset::Exome)]
#[case::unknown("preset: panel\n", Preset::Exome)]
#[case::genome("preset: genome\n", Preset::Genome)]
fn presets_by_name(#[case] preset_line: &str, #[case] expected: Preset) {
    let yaml = format!("sample: {{vcf: /data/sample.vcf}}\n{preset_line}");
    let translated = translate_yaml(&yaml).unwrap();
    assert!(matches!(translated.job, JobSpec::Preset { preset, .. } if preset == expected));
    assert_eq!(translated.steps, expected.build().unwrap().steps().to_vec());
}

#[test]
fn explicit_analysis_round_trips() {
    let yaml = r#"
sample:
  vcf: /data/Pfeiffer.vcf.gz
analysis:
  analysisMode: FULL
  inheritanceModes: {AUTOSOMAL_DOMINANT: 0.1, MITOCHONDRIAL: 0.2}
  frequencySources: [THOUSAND_GENOMES, UK10K]
  pathogenicitySources: [REVEL]
  steps:
    - intervalFilter: {intervals: ['chr10:123256200-123256300', 'chrX:1-1000']}
    - genePanelFilter: {geneSymbols: [FGFR2, FGFR1]}
    - variantEffectFilter: {remove: [SYNONYMOUS_VARIANT, INTERGENIC_VARIANT]}
    - qualityFilter: {minQuality: 30.0}
    - knownVariantFilter: {}
    - frequencyFilter: {}
    - pathogenicityFilter: {}
    - regulatoryFeatureFilter: {}
    - phenixPrioritiser: {}
    - priorityScoreFilter: {priorityType: PHENIX_PRIORITY, minPriorityScore: 0.3}
    - hiPhivePrioritiser: {diseaseId: 'OMIM:101600', candidateGeneSymbol: FGFR2, runParams: 'human,ppi'}
"#;
    let translator = JobTranslator::default();
    let document = read_yaml(yaml);
    let (_, pipeline) = translator.translate_document(document.clone()).unwrap();

    let written = JobDocument { analysis: Some(pipeline.to_analysis()), ..document };
    let json = serde_json::to_string(&written).unwrap();
    let schema = load_schema().unwrap();
    let reread = read_str(&schema, &json, false).unwrap();
    let (_, again) = translator.translate_document(reread).unwrap();

    assert_eq!(*again, *pipeline);
}

#[test]
fn genome_preset_with_analysis_is_ambiguous() {
    let yaml = "sample: {vcf: /data/sample.vcf}\npreset: genome\nanalysis:\n  steps: []\n";
    assert!(matches!(translate_yaml(yaml), Err(BuildError::AmbiguousJobShape { .. })));
}
