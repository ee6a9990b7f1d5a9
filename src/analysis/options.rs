//! Effective parameter values for steps whose parameters were left out of the job

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::settings::GlobalSettings;
use crate::error::BuildError;
use crate::model::named::named_enum;

named_enum! {
    /// Evidence sources HiPhive may compare phenotypes against
    pub enum HiPhiveRunParam {
        Human => "human",
        Mouse => "mouse",
        Fish => "fish",
        Ppi => "ppi",
    }
}

/// How a HiPhive prioritiser should run. No run params means every source is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HiPhiveOptions {
    pub disease_id: Option<String>,
    pub candidate_gene_symbol: Option<String>,
    pub run_params: Vec<HiPhiveRunParam>,
}

impl HiPhiveOptions {
    /// Parse a comma separated run params string such as "human,mouse,fish,ppi"
    pub fn parse(disease_id: Option<&str>, candidate_gene_symbol: Option<&str>, run_params: Option<&str>) -> Result<Self, BuildError> {
        let mut params = Vec::new();
        for token in run_params.unwrap_or_default().split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let param: HiPhiveRunParam = token.parse().map_err(|err: crate::model::named::UnknownName| {
                BuildError::UnknownHiPhiveRunParam { name: err.name.clone(), permitted: err.permitted_list() }
            })?;
            if !params.contains(&param) {
                params.push(param);
            }
        }
        Ok(HiPhiveOptions {
            disease_id: non_empty(disease_id),
            candidate_gene_symbol: non_empty(candidate_gene_symbol),
            run_params: params,
        })
    }

    pub fn run_params_string(&self) -> String {
        self.run_params
            .iter()
            .map(HiPhiveRunParam::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn runs(&self, param: HiPhiveRunParam) -> bool {
        self.run_params.is_empty() || self.run_params.contains(&param)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Derives effective step parameters from what the job supplied and the analysis-wide settings
pub struct OptionResolver<'a> {
    settings: &'a GlobalSettings,
}

impl<'a> OptionResolver<'a> {
    pub fn new(settings: &'a GlobalSettings) -> Self {
        OptionResolver { settings }
    }

    /// An explicit value always wins. Without one, fall back to the highest inheritance mode
    /// cutoff, failing if no inheritance modes were configured.
    pub fn max_frequency(&self, explicit: Option<f32>) -> Result<f32, BuildError> {
        match explicit {
            Some(value) if !value.is_finite() || !(0.0..=100.0).contains(&value) => Err(BuildError::InvalidFrequency { value }),
            Some(value) => Ok(value),
            None => {
                let inherited = self.settings.inheritance_modes.max_frequency().ok_or(BuildError::MissingMaxFrequency)?;
                debug!("maxFrequency not defined - using inheritanceModeOptions max frequency {inherited}");
                Ok(inherited)
            }
        }
    }

    pub fn min_quality(&self, explicit: Option<f64>) -> Result<f64, BuildError> {
        match explicit {
            Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(BuildError::MissingQualityThreshold),
        }
    }

    pub fn min_priority_score(&self, explicit: Option<f32>) -> Result<f32, BuildError> {
        match explicit {
            Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(BuildError::MissingMinScore),
        }
    }

    /// n.b. defaults to false if not set
    pub fn keep_non_pathogenic(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(false)
    }
}
