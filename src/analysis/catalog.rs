//! The known step kinds, their parameters and the settings they depend on

use crate::model::named::named_enum;

named_enum! {
    /// Every kind of step an analysis may contain, named as on the wire
    pub enum StepKind {
        IntervalFilter => "intervalFilter",
        GenePanelFilter => "genePanelFilter",
        VariantEffectFilter => "variantEffectFilter",
        QualityFilter => "qualityFilter",
        KnownVariantFilter => "knownVariantFilter",
        FrequencyFilter => "frequencyFilter",
        PathogenicityFilter => "pathogenicityFilter",
        InheritanceFilter => "inheritanceFilter",
        PriorityScoreFilter => "priorityScoreFilter",
        RegulatoryFeatureFilter => "regulatoryFeatureFilter",
        FailedVariantFilter => "failedVariantFilter",
        OmimPrioritiser => "omimPrioritiser",
        HiPhivePrioritiser => "hiPhivePrioritiser",
        PhivePrioritiser => "phivePrioritiser",
        PhenixPrioritiser => "phenixPrioritiser",
    }
}

named_enum! {
    /// Score types produced by prioritisers
    pub enum PriorityType {
        OmimPriority => "OMIM_PRIORITY",
        HiphivePriority => "HIPHIVE_PRIORITY",
        PhivePriority => "PHIVE_PRIORITY",
        PhenixPriority => "PHENIX_PRIORITY",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCategory {
    /// admits or rejects individual variants
    VariantFilter,
    /// admits or rejects whole genes, and with them their variants
    GeneFilter,
    /// records a relevance score on every gene
    Prioritiser,
}

/// Analysis-wide settings or earlier steps a step cannot do without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    FrequencySources,
    PathogenicitySources,
    PrecedingPrioritiser,
}

/// One parameter accepted by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl ParameterSpec {
    pub fn describe(&self) -> String {
        match self.required {
            true => format!("{} (required): {}", self.name, self.description),
            false => format!("{}: {}", self.name, self.description),
        }
    }
}

const fn optional(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec { name, required: false, description }
}

const fn required(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec { name, required: true, description }
}

const INTERVAL_PARAMS: &[ParameterSpec] = &[
    optional("interval", "a single interval e.g. chr10:122892600-122892700"),
    optional("intervals", "a list of intervals"),
    optional("bed", "path to a BED file of regions"),
];
const GENE_PANEL_PARAMS: &[ParameterSpec] = &[required("geneSymbols", "HGNC symbols of the genes to keep")];
const VARIANT_EFFECT_PARAMS: &[ParameterSpec] = &[required("remove", "variant effects to remove")];
const QUALITY_PARAMS: &[ParameterSpec] = &[required("minQuality", "minimum PHRED call quality")];
const FREQUENCY_PARAMS: &[ParameterSpec] = &[optional(
    "maxFrequency",
    "maximum allele frequency in percent, defaults to the highest inheritance mode cutoff",
)];
const PATHOGENICITY_PARAMS: &[ParameterSpec] = &[optional("keepNonPathogenic", "keep variants predicted benign, default false")];
const PRIORITY_SCORE_PARAMS: &[ParameterSpec] = &[
    required("priorityType", "score type produced by an earlier prioritiser"),
    required("minPriorityScore", "minimum score a gene must reach"),
];
const HIPHIVE_PARAMS: &[ParameterSpec] = &[
    optional("diseaseId", "disease to compare against e.g. OMIM:101600"),
    optional("candidateGeneSymbol", "a gene suspected to be causative"),
    optional("runParams", "comma separated subset of human,mouse,fish,ppi"),
];

impl StepKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            StepKind::IntervalFilter => "Interval filter",
            StepKind::GenePanelFilter => "Gene panel filter",
            StepKind::VariantEffectFilter => "Variant effect filter",
            StepKind::QualityFilter => "Quality filter",
            StepKind::KnownVariantFilter => "Known variant filter",
            StepKind::FrequencyFilter => "Frequency filter",
            StepKind::PathogenicityFilter => "Pathogenicity filter",
            StepKind::InheritanceFilter => "Inheritance filter",
            StepKind::PriorityScoreFilter => "Priority score filter",
            StepKind::RegulatoryFeatureFilter => "Regulatory feature filter",
            StepKind::FailedVariantFilter => "Failed variant filter",
            StepKind::OmimPrioritiser => "OMIM prioritiser",
            StepKind::HiPhivePrioritiser => "HiPhive prioritiser",
            StepKind::PhivePrioritiser => "Phive prioritiser",
            StepKind::PhenixPrioritiser => "Phenix prioritiser",
        }
    }

    pub fn category(&self) -> StepCategory {
        match self {
            StepKind::InheritanceFilter | StepKind::PriorityScoreFilter => StepCategory::GeneFilter,
            StepKind::OmimPrioritiser
            | StepKind::HiPhivePrioritiser
            | StepKind::PhivePrioritiser
            | StepKind::PhenixPrioritiser => StepCategory::Prioritiser,
            _ => StepCategory::VariantFilter,
        }
    }

    pub fn parameters(&self) -> &'static [ParameterSpec] {
        match self {
            StepKind::IntervalFilter => INTERVAL_PARAMS,
            StepKind::GenePanelFilter => GENE_PANEL_PARAMS,
            StepKind::VariantEffectFilter => VARIANT_EFFECT_PARAMS,
            StepKind::QualityFilter => QUALITY_PARAMS,
            StepKind::FrequencyFilter => FREQUENCY_PARAMS,
            StepKind::PathogenicityFilter => PATHOGENICITY_PARAMS,
            StepKind::PriorityScoreFilter => PRIORITY_SCORE_PARAMS,
            StepKind::HiPhivePrioritiser => HIPHIVE_PARAMS,
            _ => &[],
        }
    }

    /// Rejects parameter names the step does not accept, listing the ones it does
    pub fn check_parameter_names<'a>(&self, supplied: impl IntoIterator<Item = &'a str>) -> Result<(), String> {
        let accepted = self.parameters();
        let unknown: Vec<&str> = supplied
            .into_iter()
            .filter(|name| !accepted.iter().any(|param| param.name == *name))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        let expected = match accepted.is_empty() {
            true => "it takes no parameters".to_string(),
            false => {
                let described: Vec<String> = accepted.iter().map(ParameterSpec::describe).collect();
                format!("accepted: {}", described.join("; "))
            }
        };
        Err(format!("{} does not accept {}; {expected}", self.as_str(), unknown.join(", ")))
    }

    pub fn preconditions(&self) -> &'static [Precondition] {
        match self {
            StepKind::KnownVariantFilter | StepKind::FrequencyFilter => &[Precondition::FrequencySources],
            StepKind::PathogenicityFilter => &[Precondition::PathogenicitySources],
            StepKind::PriorityScoreFilter => &[Precondition::PrecedingPrioritiser],
            _ => &[],
        }
    }

    /// The score type written by a prioritiser step
    pub fn priority_type(&self) -> Option<PriorityType> {
        match self {
            StepKind::OmimPrioritiser => Some(PriorityType::OmimPriority),
            StepKind::HiPhivePrioritiser => Some(PriorityType::HiphivePriority),
            StepKind::PhivePrioritiser => Some(PriorityType::PhivePriority),
            StepKind::PhenixPrioritiser => Some(PriorityType::PhenixPriority),
            _ => None,
        }
    }

    /// Whether a collaborator failure in this step aborts the run rather than being recorded
    pub fn is_fatal_on_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_prioritiser_produces_a_score_type() {
        for kind in StepKind::ALL {
            let is_prioritiser = kind.category() == StepCategory::Prioritiser;
            assert_eq!(is_prioritiser, kind.priority_type().is_some(), "{kind}");
        }
    }

    #[test]
    fn frequency_steps_need_frequency_sources() {
        assert_eq!(StepKind::KnownVariantFilter.preconditions(), &[Precondition::FrequencySources]);
        assert_eq!(StepKind::FrequencyFilter.preconditions(), &[Precondition::FrequencySources]);
        assert!(StepKind::QualityFilter.preconditions().is_empty());
    }

    #[test]
    fn wire_names_round_trip() {
        for kind in StepKind::ALL {
            assert_eq!(kind.as_str().parse::<StepKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn unknown_parameter_names_list_accepted_ones() {
        assert!(StepKind::QualityFilter.check_parameter_names(["minQuality"]).is_ok());
        assert_eq!(
            StepKind::QualityFilter.check_parameter_names(["minQualty"]),
            Err("qualityFilter does not accept minQualty; accepted: minQuality (required): minimum PHRED call quality"
                .to_string())
        );
        assert_eq!(
            StepKind::KnownVariantFilter.check_parameter_names(["maxFrequency"]),
            Err("knownVariantFilter does not accept maxFrequency; it takes no parameters".to_string())
        );
    }
}
