//! Analysis-wide settings and the process-wide defaults used by the presets

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use crate::error::BuildError;
use crate::model::inheritance::SubModeOfInheritance;
use crate::model::named::named_enum;
use crate::model::source::{FrequencySource, PathogenicitySource};

named_enum! {
    /// How failing variants are treated while the pipeline runs.
    ///
    /// FULL keeps failing variants in the working set, annotated as failed. PASS_ONLY drops them
    /// as soon as a filter fails them. SPARSE drops them too, but still returns them flagged as
    /// removed.
    pub enum AnalysisMode {
        Full => "FULL",
        PassOnly => "PASS_ONLY",
        Sparse => "SPARSE",
    }
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode::PassOnly
    }
}

impl AnalysisMode {
    pub fn removes_failed(&self) -> bool {
        !matches!(self, AnalysisMode::Full)
    }
}

/// Frequency cutoffs, in percent, for each sub-mode of inheritance under consideration.
///
/// An empty table is valid and disables inheritance-aware defaulting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InheritanceModeOptions {
    cutoffs: BTreeMap<SubModeOfInheritance, f32>,
}

impl InheritanceModeOptions {
    pub fn empty() -> Self {
        InheritanceModeOptions::default()
    }

    pub fn of(cutoffs: BTreeMap<SubModeOfInheritance, f32>) -> Result<Self, BuildError> {
        for (mode, value) in &cutoffs {
            if !value.is_finite() || *value < 0.0 {
                return Err(BuildError::InvalidInheritanceCutoff { mode: mode.to_string(), value: *value });
            }
        }
        Ok(InheritanceModeOptions { cutoffs })
    }

    pub fn defaults() -> Self {
        DEFAULT_INHERITANCE_MODES.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }

    pub fn cutoffs(&self) -> &BTreeMap<SubModeOfInheritance, f32> {
        &self.cutoffs
    }

    pub fn modes(&self) -> impl Iterator<Item = &SubModeOfInheritance> {
        self.cutoffs.keys()
    }

    /// The most permissive cutoff in the table
    pub fn max_frequency(&self) -> Option<f32> {
        self.cutoffs.values().copied().reduce(f32::max)
    }
}

/// Settings shared by every step of one analysis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalSettings {
    pub analysis_mode: AnalysisMode,
    pub inheritance_modes: InheritanceModeOptions,
    pub frequency_sources: BTreeSet<FrequencySource>,
    pub pathogenicity_sources: BTreeSet<PathogenicitySource>,
}

pub static DEFAULT_INHERITANCE_MODES: Lazy<InheritanceModeOptions> = Lazy::new(|| {
    use SubModeOfInheritance::*;
    // all frequencies are in percent
    let cutoffs = BTreeMap::from([
        (AutosomalDominant, 0.1),
        (AutosomalRecessiveCompHet, 2.0),
        (AutosomalRecessiveHomAlt, 0.1),
        (XDominant, 0.1),
        (XRecessiveCompHet, 2.0),
        (XRecessiveHomAlt, 0.1),
        (Mitochondrial, 0.2),
    ]);
    InheritanceModeOptions { cutoffs }
});

/// Every population source except LOCAL and the Ashkenazi gnomAD subsets
pub static DEFAULT_FREQUENCY_SOURCES: Lazy<BTreeSet<FrequencySource>> = Lazy::new(|| {
    use FrequencySource::*;
    BTreeSet::from([
        EspAfricanAmerican,
        EspAll,
        EspEuropeanAmerican,
        ThousandGenomes,
        ExacAfricanIncAfricanAmerican,
        ExacAmerican,
        ExacEastAsian,
        ExacFinnish,
        ExacNonFinnishEuropean,
        ExacSouthAsian,
        ExacOther,
        Uk10k,
        Topmed,
        GnomadEAfr,
        GnomadEAmr,
        GnomadEEas,
        GnomadEFin,
        GnomadENfe,
        GnomadEOth,
        GnomadESas,
        GnomadGAfr,
        GnomadGAmr,
        GnomadGEas,
        GnomadGFin,
        GnomadGNfe,
        GnomadGOth,
        GnomadGSas,
    ])
});
