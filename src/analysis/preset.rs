//! The two hand-tuned pipelines shipped with varsift
//!
//! Presets go through [`PipelineBuilder`] exactly like user-written analyses, so they are held to
//! the same validation rules. Each is built once per process and shared afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{info, warn};
use once_cell::sync::{Lazy, OnceCell};

use crate::analysis::builder::PipelineBuilder;
use crate::analysis::catalog::PriorityType;
use crate::analysis::options::{HiPhiveOptions, HiPhiveRunParam};
use crate::analysis::settings::{AnalysisMode, InheritanceModeOptions, DEFAULT_FREQUENCY_SOURCES};
use crate::analysis::step::PipelineSpec;
use crate::error::BuildError;
use crate::model::effect::VariantEffect;
use crate::model::source::PathogenicitySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Exome,
    Genome,
}

static HI_PHIVE_OPTIONS: Lazy<HiPhiveOptions> = Lazy::new(|| HiPhiveOptions {
    run_params: vec![HiPhiveRunParam::Human, HiPhiveRunParam::Mouse, HiPhiveRunParam::Fish, HiPhiveRunParam::Ppi],
    ..HiPhiveOptions::default()
});

static EXOME_PIPELINE: OnceCell<Arc<PipelineSpec>> = OnceCell::new();
static GENOME_PIPELINE: OnceCell<Arc<PipelineSpec>> = OnceCell::new();

impl Preset {
    /// Anything other than "genome" (in any case) is treated as the exome preset
    pub fn from_name(name: Option<&str>) -> Preset {
        match name.map(|n| n.trim().to_ascii_lowercase()) {
            Some(name) if name == "genome" => Preset::Genome,
            Some(name) if name.is_empty() || name == "exome" => Preset::Exome,
            None => Preset::Exome,
            Some(name) => {
                warn!("Unrecognised preset '{name}', using exome");
                Preset::Exome
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Exome => "exome",
            Preset::Genome => "genome",
        }
    }

    /// The shared, cached pipeline for this preset
    pub fn pipeline(&self) -> Result<Arc<PipelineSpec>, BuildError> {
        let cell = match self {
            Preset::Exome => &EXOME_PIPELINE,
            Preset::Genome => &GENOME_PIPELINE,
        };
        cell.get_or_try_init(|| {
            info!("Building {} preset", self.name());
            self.build().map(Arc::new)
        })
        .cloned()
    }

    pub fn build(&self) -> Result<PipelineSpec, BuildError> {
        match self {
            Preset::Exome => build_exome_preset(),
            Preset::Genome => build_genome_preset(),
        }
    }
}

fn build_genome_preset() -> Result<PipelineSpec, BuildError> {
    use PathogenicitySource::*;
    PipelineBuilder::new()
        .analysis_mode(AnalysisMode::PassOnly)
        .inheritance_modes(InheritanceModeOptions::defaults())
        .frequency_sources(DEFAULT_FREQUENCY_SOURCES.clone())
        .pathogenicity_sources(BTreeSet::from([Revel, Mvp, Remm]))
        .add_hiphive_prioritiser(HI_PHIVE_OPTIONS.clone())?
        // removes a lot of the weak PPI hits
        .add_priority_score_filter(PriorityType::HiphivePriority, 0.5)?
        .add_failed_variant_filter()?
        .add_regulatory_feature_filter()?
        .add_frequency_filter(None)?
        .add_pathogenicity_filter(true)?
        .add_inheritance_filter()?
        .add_omim_prioritiser()?
        .build()
}

fn build_exome_preset() -> Result<PipelineSpec, BuildError> {
    use PathogenicitySource::*;
    use VariantEffect::*;
    PipelineBuilder::new()
        .analysis_mode(AnalysisMode::PassOnly)
        .inheritance_modes(InheritanceModeOptions::defaults())
        .frequency_sources(DEFAULT_FREQUENCY_SOURCES.clone())
        .pathogenicity_sources(BTreeSet::from([Revel, Mvp]))
        .add_variant_effect_filter(BTreeSet::from([
            FivePrimeUtrExonVariant,
            FivePrimeUtrIntronVariant,
            ThreePrimeUtrExonVariant,
            ThreePrimeUtrIntronVariant,
            NonCodingTranscriptExonVariant,
            NonCodingTranscriptIntronVariant,
            CodingTranscriptIntronVariant,
            UpstreamGeneVariant,
            DownstreamGeneVariant,
            IntergenicVariant,
            RegulatoryRegionVariant,
        ]))?
        .add_failed_variant_filter()?
        .add_frequency_filter(None)?
        .add_pathogenicity_filter(true)?
        .add_inheritance_filter()?
        .add_omim_prioritiser()?
        .add_hiphive_prioritiser(HI_PHIVE_OPTIONS.clone())?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::StepKind;
    use crate::analysis::step::StepSpec;

    #[test]
    fn unknown_names_fall_back_to_exome() {
        assert_eq!(Preset::from_name(None), Preset::Exome);
        assert_eq!(Preset::from_name(Some("EXOME")), Preset::Exome);
        assert_eq!(Preset::from_name(Some("panel")), Preset::Exome);
        assert_eq!(Preset::from_name(Some("GENOME")), Preset::Genome);
    }

    #[test]
    fn exome_step_order() {
        let spec = Preset::Exome.build().unwrap();
        assert_eq!(
            spec.kinds(),
            vec![
                StepKind::VariantEffectFilter,
                StepKind::FailedVariantFilter,
                StepKind::FrequencyFilter,
                StepKind::PathogenicityFilter,
                StepKind::InheritanceFilter,
                StepKind::OmimPrioritiser,
                StepKind::HiPhivePrioritiser,
            ]
        );
        assert_eq!(spec.steps()[2], StepSpec::FrequencyFilter { max_frequency: 2.0 });
        assert_eq!(spec.settings().analysis_mode, AnalysisMode::PassOnly);
    }

    #[test]
    fn genome_keeps_literal_call_order() {
        let spec = Preset::Genome.build().unwrap();
        assert_eq!(
            spec.kinds(),
            vec![
                StepKind::HiPhivePrioritiser,
                StepKind::PriorityScoreFilter,
                StepKind::FailedVariantFilter,
                StepKind::RegulatoryFeatureFilter,
                StepKind::FrequencyFilter,
                StepKind::PathogenicityFilter,
                StepKind::InheritanceFilter,
                StepKind::OmimPrioritiser,
            ]
        );
        assert!(spec.settings().pathogenicity_sources.contains(&PathogenicitySource::Remm));
    }

    #[test]
    fn cached_pipeline_is_shared() {
        let first = Preset::Genome.pipeline().unwrap();
        let second = Preset::Genome.pipeline().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, Preset::Genome.build().unwrap());
    }
}
