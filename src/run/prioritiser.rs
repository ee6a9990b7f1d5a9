//! Prioritisers record a relevance score on every gene they are given

use std::sync::Arc;

use log::debug;

use crate::analysis::catalog::{PriorityType, StepKind};
use crate::analysis::options::{HiPhiveOptions, HiPhiveRunParam};
use crate::error::StepError;
use crate::model::gene::Gene;
use crate::service::{Disease, DiseaseSource, InheritanceCode, PhenotypeQuery, PhenotypeScorer};

/// A gene's relevance according to one prioritiser
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityResult {
    pub score: f64,
    pub explanation: String,
}

pub trait Prioritiser: Send + Sync {
    fn kind(&self) -> StepKind;

    fn priority_type(&self) -> PriorityType;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn messages(&self) -> Vec<String>;

    fn score(&self, gene: &Gene) -> Result<PriorityResult, StepError>;
}

/// Scores genes by how well their observed inheritance fits the OMIM diseases they cause
pub struct OmimPrioritiser {
    diseases: Arc<dyn DiseaseSource>,
}

impl OmimPrioritiser {
    pub fn new(diseases: Arc<dyn DiseaseSource>) -> Self {
        OmimPrioritiser { diseases }
    }
}

impl Prioritiser for OmimPrioritiser {
    fn kind(&self) -> StepKind {
        StepKind::OmimPrioritiser
    }

    fn priority_type(&self) -> PriorityType {
        PriorityType::OmimPriority
    }

    fn messages(&self) -> Vec<String> {
        vec!["Scored genes by inheritance compatibility with known OMIM diseases".to_string()]
    }

    /// The best inheritance factor over the gene's diseases. A gene with no known diseases is not
    /// penalised.
    fn score(&self, gene: &Gene) -> Result<PriorityResult, StepError> {
        let Some(entrez_id) = gene.entrez_id else {
            return Ok(PriorityResult { score: 1.0, explanation: "No Entrez id".to_string() });
        };
        let diseases = self.diseases.diseases_for_gene(entrez_id)?;
        if diseases.is_empty() {
            return Ok(PriorityResult { score: 1.0, explanation: "No known OMIM diseases".to_string() });
        }
        let score = diseases
            .iter()
            .map(|disease| inheritance_factor(gene, disease))
            .fold(0.0, f64::max);
        let explanation = diseases
            .iter()
            .map(|disease| format!("{} {} ({})", disease.id, disease.name, disease.inheritance))
            .collect::<Vec<_>>()
            .join("; ");
        debug!("{} OMIM score {score}", gene.symbol);
        Ok(PriorityResult { score, explanation })
    }
}

/// 1.0 when the gene's observed inheritance could explain the disease, 0.5 otherwise
pub fn inheritance_factor(gene: &Gene, disease: &Disease) -> f64 {
    let compatible = match disease.inheritance {
        InheritanceCode::Unknown | InheritanceCode::YLinked | InheritanceCode::Mitochondrial => true,
        InheritanceCode::AutosomalDominant => gene.is_consistent_with_dominant(),
        InheritanceCode::AutosomalRecessive => gene.is_consistent_with_recessive(),
        InheritanceCode::AutosomalDominantAndRecessive => {
            gene.is_consistent_with_dominant() || gene.is_consistent_with_recessive()
        }
        InheritanceCode::XLinked => gene.is_x_chromosomal(),
        InheritanceCode::Somatic | InheritanceCode::Polygenic => false,
    };
    match compatible {
        true => 1.0,
        false => 0.5,
    }
}

/// HiPhive, Phive and Phenix all hand the comparison itself to a [`PhenotypeScorer`]
pub struct PhenotypePrioritiser {
    kind: StepKind,
    priority_type: PriorityType,
    scorer: Arc<dyn PhenotypeScorer>,
    hpo_ids: Vec<String>,
    options: Option<HiPhiveOptions>,
}

impl PhenotypePrioritiser {
    pub fn hiphive(scorer: Arc<dyn PhenotypeScorer>, hpo_ids: Vec<String>, options: HiPhiveOptions) -> Self {
        PhenotypePrioritiser {
            kind: StepKind::HiPhivePrioritiser,
            priority_type: PriorityType::HiphivePriority,
            scorer,
            hpo_ids,
            options: Some(options),
        }
    }

    pub fn phive(scorer: Arc<dyn PhenotypeScorer>, hpo_ids: Vec<String>) -> Self {
        PhenotypePrioritiser {
            kind: StepKind::PhivePrioritiser,
            priority_type: PriorityType::PhivePriority,
            scorer,
            hpo_ids,
            options: None,
        }
    }

    pub fn phenix(scorer: Arc<dyn PhenotypeScorer>, hpo_ids: Vec<String>) -> Self {
        PhenotypePrioritiser {
            kind: StepKind::PhenixPrioritiser,
            priority_type: PriorityType::PhenixPriority,
            scorer,
            hpo_ids,
            options: None,
        }
    }
}

impl Prioritiser for PhenotypePrioritiser {
    fn kind(&self) -> StepKind {
        self.kind
    }

    fn priority_type(&self) -> PriorityType {
        self.priority_type
    }

    fn messages(&self) -> Vec<String> {
        let mut messages = vec![format!("Phenotype terms: {}", self.hpo_ids.join(", "))];
        if let Some(options) = &self.options {
            let run_params: Vec<&str> = HiPhiveRunParam::ALL
                .iter()
                .filter(|param| options.runs(**param))
                .map(HiPhiveRunParam::as_str)
                .collect();
            messages.push(format!("Run params: {}", run_params.join(",")));
        }
        messages
    }

    fn score(&self, gene: &Gene) -> Result<PriorityResult, StepError> {
        let query = PhenotypeQuery {
            priority_type: self.priority_type,
            gene,
            hpo_ids: &self.hpo_ids,
            options: self.options.as_ref(),
        };
        self.scorer.score(&query)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::*;
    use crate::model::inheritance::SubModeOfInheritance;
    use crate::service::InMemoryDiseases;

    fn disease(inheritance: InheritanceCode) -> Disease {
        Disease { id: "OMIM:101600".to_string(), name: "Pfeiffer syndrome".to_string(), inheritance }
    }

    #[rstest]
    #[case(InheritanceCode::AutosomalDominant, Some(SubModeOfInheritance::AutosomalDominant), 1.0)]
    #[case(InheritanceCode::AutosomalDominant, Some(SubModeOfInheritance::AutosomalRecessiveHomAlt), 0.5)]
    #[case(InheritanceCode::AutosomalRecessive, Some(SubModeOfInheritance::AutosomalRecessiveCompHet), 1.0)]
    #[case(InheritanceCode::AutosomalDominantAndRecessive, Some(SubModeOfInheritance::AutosomalRecessiveHomAlt), 1.0)]
    #[case(InheritanceCode::XLinked, Some(SubModeOfInheritance::XRecessiveHomAlt), 1.0)]
    #[case(InheritanceCode::XLinked, None, 0.5)]
    #[case(InheritanceCode::Unknown, None, 1.0)]
    #[case(InheritanceCode::Somatic, Some(SubModeOfInheritance::AutosomalDominant), 0.5)]
    #[case(InheritanceCode::Polygenic, None, 0.5)]
    fn inheritance_factors(#[case] code: InheritanceCode, #[case] mode: Option<SubModeOfInheritance>, #[case] expected: f64) {
        let mut gene = Gene::new("FGFR2", Some(2263));
        if let Some(mode) = mode {
            gene = gene.with_compatible_mode(mode);
        }
        assert_eq!(inheritance_factor(&gene, &disease(code)), expected);
    }

    #[test]
    fn omim_scores_best_matching_disease() {
        let diseases = InMemoryDiseases::new(BTreeMap::from([(
            2263,
            vec![disease(InheritanceCode::AutosomalRecessive), disease(InheritanceCode::AutosomalDominant)],
        )]));
        let prioritiser = OmimPrioritiser::new(Arc::new(diseases));
        let gene = Gene::new("FGFR2", Some(2263)).with_compatible_mode(SubModeOfInheritance::AutosomalDominant);
        assert_eq!(prioritiser.score(&gene).unwrap().score, 1.0);

        let unknown = Gene::new("NOVEL1", Some(999));
        assert_eq!(prioritiser.score(&unknown).unwrap().score, 1.0);
        let no_entrez = Gene::new("NOVEL2", None);
        assert_eq!(prioritiser.score(&no_entrez).unwrap().explanation, "No Entrez id");
    }

    struct NoScorer;

    impl PhenotypeScorer for NoScorer {
        fn score(&self, _query: &PhenotypeQuery) -> Result<PriorityResult, StepError> {
            Err(StepError::Unavailable("phenotype data"))
        }
    }

    #[rstest]
    #[case::every_source(None, "Run params: human,mouse,fish,ppi")]
    #[case::subset(Some("ppi, mouse"), "Run params: mouse,ppi")]
    fn hiphive_reports_sources_it_runs(#[case] run_params: Option<&str>, #[case] expected: &str) {
        let options = HiPhiveOptions::parse(None, None, run_params).unwrap();
        let prioritiser = PhenotypePrioritiser::hiphive(Arc::new(NoScorer), vec!["HP:0001156".to_string()], options);
        assert_eq!(prioritiser.messages(), vec!["Phenotype terms: HP:0001156".to_string(), expected.to_string()]);
    }
}
