//! Write a pipeline back out in the job wire format

use crate::analysis::step::{IntervalSource, PipelineSpec, StepSpec};
use crate::request::job::{
    AnalysisDoc, AnalysisStep, FrequencyFilterDoc, GenePanelFilterDoc, HiPhivePrioritiserDoc, IntervalFilterDoc,
    NoOptions, PathogenicityFilterDoc, PriorityScoreFilterDoc, QualityFilterDoc, VariantEffectFilterDoc,
};

impl PipelineSpec {
    /// The analysis that translates back into this pipeline. Derived values, such as a frequency
    /// threshold taken from the inheritance modes, are written out explicitly.
    pub fn to_analysis(&self) -> AnalysisDoc {
        let settings = self.settings();
        AnalysisDoc {
            analysis_mode: Some(settings.analysis_mode.to_string()),
            inheritance_modes: settings
                .inheritance_modes
                .cutoffs()
                .iter()
                .map(|(mode, cutoff)| (mode.to_string(), *cutoff))
                .collect(),
            frequency_sources: settings.frequency_sources.iter().map(ToString::to_string).collect(),
            pathogenicity_sources: settings.pathogenicity_sources.iter().map(ToString::to_string).collect(),
            steps: self.steps().iter().map(encode_step).collect(),
            ..AnalysisDoc::default()
        }
    }
}

fn encode_step(step: &StepSpec) -> AnalysisStep {
    match step {
        StepSpec::IntervalFilter { intervals } => AnalysisStep::IntervalFilter(match intervals {
            IntervalSource::Single(interval) => IntervalFilterDoc { interval: Some(interval.to_string()), ..Default::default() },
            IntervalSource::List(intervals) => IntervalFilterDoc {
                intervals: intervals.iter().map(ToString::to_string).collect(),
                ..Default::default()
            },
            IntervalSource::Bed(path) => IntervalFilterDoc {
                bed: Some(path.to_string_lossy().into_owned()),
                ..Default::default()
            },
        }),
        StepSpec::GenePanelFilter { gene_symbols } => {
            AnalysisStep::GenePanelFilter(GenePanelFilterDoc { gene_symbols: gene_symbols.clone() })
        }
        StepSpec::VariantEffectFilter { remove } => AnalysisStep::VariantEffectFilter(VariantEffectFilterDoc {
            remove: remove.iter().map(ToString::to_string).collect(),
        }),
        StepSpec::QualityFilter { min_quality } => {
            AnalysisStep::QualityFilter(QualityFilterDoc { min_quality: Some(*min_quality) })
        }
        StepSpec::KnownVariantFilter => AnalysisStep::KnownVariantFilter(NoOptions {}),
        StepSpec::FrequencyFilter { max_frequency } => {
            AnalysisStep::FrequencyFilter(FrequencyFilterDoc { max_frequency: Some(*max_frequency) })
        }
        StepSpec::PathogenicityFilter { keep_non_pathogenic } => AnalysisStep::PathogenicityFilter(PathogenicityFilterDoc {
            keep_non_pathogenic: Some(*keep_non_pathogenic),
        }),
        StepSpec::InheritanceFilter => AnalysisStep::InheritanceFilter(NoOptions {}),
        StepSpec::PriorityScoreFilter { priority_type, min_priority_score } => {
            AnalysisStep::PriorityScoreFilter(PriorityScoreFilterDoc {
                priority_type: Some(priority_type.to_string()),
                min_priority_score: Some(*min_priority_score),
            })
        }
        StepSpec::RegulatoryFeatureFilter => AnalysisStep::RegulatoryFeatureFilter(NoOptions {}),
        StepSpec::FailedVariantFilter => AnalysisStep::FailedVariantFilter(NoOptions {}),
        StepSpec::OmimPrioritiser => AnalysisStep::OmimPrioritiser(NoOptions {}),
        StepSpec::HiPhivePrioritiser(options) => AnalysisStep::HiPhivePrioritiser(HiPhivePrioritiserDoc {
            disease_id: options.disease_id.clone(),
            candidate_gene_symbol: options.candidate_gene_symbol.clone(),
            run_params: Some(options.run_params_string()).filter(|params| !params.is_empty()),
        }),
        StepSpec::PhivePrioritiser => AnalysisStep::PhivePrioritiser(NoOptions {}),
        StepSpec::PhenixPrioritiser => AnalysisStep::PhenixPrioritiser(NoOptions {}),
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::preset::Preset;
    use crate::analysis::translator::translate_analysis;
    use crate::request::job::AnalysisStep;

    #[test]
    fn presets_survive_a_round_trip() {
        for preset in [Preset::Exome, Preset::Genome] {
            let pipeline = preset.build().unwrap();
            let analysis = pipeline.to_analysis();
            assert_eq!(translate_analysis(&analysis).unwrap(), pipeline);
        }
    }

    #[test]
    fn resolved_frequency_is_written_out() {
        let analysis = Preset::Exome.build().unwrap().to_analysis();
        assert!(analysis
            .steps
            .iter()
            .any(|step| matches!(step, AnalysisStep::FrequencyFilter(doc) if doc.max_frequency == Some(2.0))));
        assert_eq!(analysis.analysis_mode.as_deref(), Some("PASS_ONLY"));
    }
}
