//! Narrow interfaces to the collaborators steps depend on, with simple implementations
//!
//! Reference data lives outside varsift. Steps only see it through these traits, so a lookup
//! failure surfaces as a [`StepError`] scoped to the step that made it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::catalog::PriorityType;
use crate::analysis::options::HiPhiveOptions;
use crate::error::StepError;
use crate::model::gene::Gene;
use crate::model::interval::GeneticInterval;
use crate::model::named::named_enum;
use crate::run::prioritiser::PriorityResult;

/// Replaces obsolete phenotype term ids with their current equivalents
pub trait OntologyService: Send + Sync {
    fn current_hpo_ids(&self, hpo_ids: &[String]) -> Vec<String>;
}

/// Leaves every term id untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOntology;

impl OntologyService for IdentityOntology {
    fn current_hpo_ids(&self, hpo_ids: &[String]) -> Vec<String> {
        hpo_ids.to_vec()
    }
}

/// Term replacements held in memory, keyed by the obsolete or alternate id
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TermMapOntology {
    replacements: BTreeMap<String, String>,
}

impl TermMapOntology {
    pub fn new(replacements: BTreeMap<String, String>) -> Self {
        TermMapOntology { replacements }
    }
}

impl OntologyService for TermMapOntology {
    /// Order is preserved and an id is only reported once, even if two obsolete ids map onto it
    fn current_hpo_ids(&self, hpo_ids: &[String]) -> Vec<String> {
        let mut current: Vec<String> = Vec::with_capacity(hpo_ids.len());
        for id in hpo_ids {
            let replacement = self.replacements.get(id).unwrap_or(id);
            if replacement != id {
                debug!("Replacing {id} with current term {replacement}");
            }
            if !current.contains(replacement) {
                current.push(replacement.clone());
            }
        }
        current
    }
}

/// Resolves a region file named by an interval filter into concrete intervals
pub trait RegionSource: Send + Sync {
    fn regions(&self, path: &Path) -> Result<Vec<GeneticInterval>, StepError>;
}

/// Reads the first three columns of a BED file, converting 0-based starts to 1-based
#[derive(Debug, Clone, Copy, Default)]
pub struct BedFileReader;

impl RegionSource for BedFileReader {
    fn regions(&self, path: &Path) -> Result<Vec<GeneticInterval>, StepError> {
        info!("Reading intervals from BED file {}", path.display());
        let regions_error = |reason: String| StepError::Regions { path: path.to_path_buf(), reason };
        let text = fs::read_to_string(path).map_err(|err| regions_error(err.to_string()))?;

        let mut intervals = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("track") || line.starts_with("browser") {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(regions_error(format!("line {} has fewer than three columns", number + 1)));
            }
            let start: u64 = fields[1]
                .parse()
                .map_err(|_| regions_error(format!("line {} has an invalid start '{}'", number + 1, fields[1])))?;
            let end: u64 = fields[2]
                .parse()
                .map_err(|_| regions_error(format!("line {} has an invalid end '{}'", number + 1, fields[2])))?;
            if start == end {
                warn!("Skipping zero-length region on line {} of {}", number + 1, path.display());
                continue;
            }
            let start = start
                .checked_add(1)
                .ok_or_else(|| regions_error(format!("line {} has an invalid start '{}'", number + 1, fields[1])))?;
            let interval = GeneticInterval::new(fields[0], start, end)
                .map_err(|reason| regions_error(format!("line {}: {reason}", number + 1)))?;
            intervals.push(interval);
        }
        debug!("Read {} intervals", intervals.len());
        Ok(intervals)
    }
}

named_enum! {
    /// OMIM style inheritance code of a disease
    pub enum InheritanceCode {
        Unknown => "U",
        AutosomalDominant => "D",
        AutosomalRecessive => "R",
        AutosomalDominantAndRecessive => "B",
        XLinked => "X",
        YLinked => "Y",
        Mitochondrial => "M",
        Somatic => "S",
        Polygenic => "P",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    pub inheritance: InheritanceCode,
}

/// Disease-gene associations, looked up by Entrez gene id
pub trait DiseaseSource: Send + Sync {
    fn diseases_for_gene(&self, entrez_id: u32) -> Result<Vec<Disease>, StepError>;
}

/// Associations held in memory, e.g. loaded from a JSON export keyed by Entrez id
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct InMemoryDiseases {
    by_gene: BTreeMap<u32, Vec<Disease>>,
}

impl InMemoryDiseases {
    pub fn new(by_gene: BTreeMap<u32, Vec<Disease>>) -> Self {
        InMemoryDiseases { by_gene }
    }
}

impl DiseaseSource for InMemoryDiseases {
    fn diseases_for_gene(&self, entrez_id: u32) -> Result<Vec<Disease>, StepError> {
        Ok(self.by_gene.get(&entrez_id).cloned().unwrap_or_default())
    }
}

/// Everything a phenotype scorer is told about one gene
#[derive(Debug, Clone, Copy)]
pub struct PhenotypeQuery<'a> {
    pub priority_type: PriorityType,
    pub gene: &'a Gene,
    pub hpo_ids: &'a [String],
    /// only set for HiPhive
    pub options: Option<&'a HiPhiveOptions>,
}

/// Compares a patient's phenotype with the evidence held for a gene
pub trait PhenotypeScorer: Send + Sync {
    fn score(&self, query: &PhenotypeQuery) -> Result<PriorityResult, StepError>;
}
