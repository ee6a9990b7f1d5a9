//! The proband being analysed, reduced from whichever representation the job used

use std::path::PathBuf;

use serde::Serialize;

use crate::error::BuildError;
use crate::model::assembly::GenomeAssembly;
use crate::request::job::{FamilyDoc, HtsFileDoc, PersonDoc, PhenopacketDoc, SampleDoc};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub genome_assembly: GenomeAssembly,
    pub vcf_path: Option<PathBuf>,
    pub ped_path: Option<PathBuf>,
    pub pedigree: Vec<PedigreeMember>,
    pub proband_id: Option<String>,
    pub hpo_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedigreeMember {
    pub id: String,
    pub father_id: Option<String>,
    pub mother_id: Option<String>,
    pub affected: bool,
}

impl Sample {
    pub fn from_sample(doc: &SampleDoc) -> Result<Sample, BuildError> {
        Ok(Sample {
            genome_assembly: parse_assembly(doc.genome_assembly.as_deref())?,
            vcf_path: non_empty(doc.vcf.as_deref()).map(PathBuf::from),
            ped_path: non_empty(doc.ped.as_deref()).map(PathBuf::from),
            pedigree: Vec::new(),
            proband_id: non_empty(doc.proband.as_deref()),
            hpo_ids: doc.hpo_ids.clone(),
        })
    }

    pub fn from_phenopacket(doc: &PhenopacketDoc) -> Result<Sample, BuildError> {
        let proband_id = doc
            .subject
            .as_ref()
            .and_then(|subject| non_empty(Some(subject.id.as_str())))
            .ok_or_else(|| BuildError::UnsupportedSampleShape { reason: "phenopacket has no subject id".to_string() })?;
        let vcf = first_vcf(&doc.hts_files);
        Ok(Sample {
            genome_assembly: parse_assembly(vcf.and_then(|file| file.genome_assembly.as_deref()))?,
            vcf_path: vcf.map(|file| vcf_path(&file.uri)),
            ped_path: None,
            pedigree: Vec::new(),
            proband_id: Some(proband_id),
            hpo_ids: observed_terms(doc),
        })
    }

    /// The family's files take precedence over the proband phenopacket's
    pub fn from_family(doc: &FamilyDoc) -> Result<Sample, BuildError> {
        let proband = doc
            .proband
            .as_ref()
            .ok_or_else(|| BuildError::UnsupportedSampleShape { reason: "family has no proband".to_string() })?;
        let mut sample = Sample::from_phenopacket(proband)?;
        if let Some(file) = first_vcf(&doc.hts_files) {
            sample.genome_assembly = parse_assembly(file.genome_assembly.as_deref())?;
            sample.vcf_path = Some(vcf_path(&file.uri));
        }
        sample.pedigree = doc
            .pedigree
            .as_ref()
            .map(|pedigree| pedigree.persons.iter().map(PedigreeMember::from).collect())
            .unwrap_or_default();
        Ok(sample)
    }
}

impl From<&PersonDoc> for PedigreeMember {
    fn from(person: &PersonDoc) -> Self {
        let parent = |id: &Option<String>| non_empty(id.as_deref()).filter(|id| id != "0");
        PedigreeMember {
            id: person.individual_id.clone(),
            father_id: parent(&person.paternal_id),
            mother_id: parent(&person.maternal_id),
            affected: matches!(person.affected_status.as_deref(), Some("AFFECTED") | Some("2")),
        }
    }
}

pub fn parse_assembly(assembly: Option<&str>) -> Result<GenomeAssembly, BuildError> {
    let assembly = assembly.unwrap_or_default();
    assembly.parse().map_err(|_| BuildError::UnsupportedAssembly {
        assembly: assembly.to_string(),
        supported: GenomeAssembly::ALL.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "),
    })
}

fn first_vcf(files: &[HtsFileDoc]) -> Option<&HtsFileDoc> {
    files.iter().find(|file| {
        file.hts_format
            .as_deref()
            .map_or(true, |format| format.eq_ignore_ascii_case("vcf"))
    })
}

fn vcf_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

fn observed_terms(doc: &PhenopacketDoc) -> Vec<String> {
    doc.phenotypic_features
        .iter()
        .filter(|feature| !feature.excluded)
        .map(|feature| feature.term.id.clone())
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::job::{OntologyClassDoc, PedigreeDoc, PhenotypicFeatureDoc, SubjectDoc};

    fn phenopacket() -> PhenopacketDoc {
        PhenopacketDoc {
            id: Some("packet-1".to_string()),
            subject: Some(SubjectDoc { id: "proband".to_string(), sex: None }),
            phenotypic_features: vec![
                PhenotypicFeatureDoc { term: OntologyClassDoc { id: "HP:0001156".to_string(), label: None }, excluded: false },
                PhenotypicFeatureDoc { term: OntologyClassDoc { id: "HP:0001363".to_string(), label: None }, excluded: true },
            ],
            hts_files: vec![HtsFileDoc {
                uri: "file:///data/proband.vcf.gz".to_string(),
                hts_format: Some("VCF".to_string()),
                genome_assembly: Some("GRCh38".to_string()),
            }],
        }
    }

    #[test]
    fn phenopacket_keeps_observed_terms() {
        let sample = Sample::from_phenopacket(&phenopacket()).unwrap();
        assert_eq!(sample.hpo_ids, vec!["HP:0001156".to_string()]);
        assert_eq!(sample.vcf_path, Some(PathBuf::from("/data/proband.vcf.gz")));
        assert_eq!(sample.genome_assembly, GenomeAssembly::Hg38);
        assert_eq!(sample.proband_id.as_deref(), Some("proband"));
    }

    #[test]
    fn phenopacket_without_subject_is_unsupported() {
        let doc = PhenopacketDoc { subject: None, ..phenopacket() };
        assert!(matches!(Sample::from_phenopacket(&doc), Err(BuildError::UnsupportedSampleShape { .. })));
    }

    #[test]
    fn family_reads_pedigree() {
        let family = FamilyDoc {
            id: Some("family".to_string()),
            proband: Some(phenopacket()),
            pedigree: Some(PedigreeDoc {
                persons: vec![PersonDoc {
                    individual_id: "proband".to_string(),
                    paternal_id: Some("0".to_string()),
                    maternal_id: Some("mother".to_string()),
                    affected_status: Some("AFFECTED".to_string()),
                    ..Default::default()
                }],
            }),
            hts_files: vec![],
        };
        let sample = Sample::from_family(&family).unwrap();
        assert_eq!(sample.pedigree.len(), 1);
        assert_eq!(sample.pedigree[0].father_id, None);
        assert_eq!(sample.pedigree[0].mother_id.as_deref(), Some("mother"));
        assert!(sample.pedigree[0].affected);
    }

    #[test]
    fn unknown_assembly_lists_supported() {
        let err = parse_assembly(Some("hg18")).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnsupportedAssembly { assembly: "hg18".to_string(), supported: "hg19, hg38".to_string() }
        );
    }
}
