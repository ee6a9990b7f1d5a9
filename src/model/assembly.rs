use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reference genome build a sample was called against
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenomeAssembly {
    Hg19,
    Hg38,
}

impl GenomeAssembly {
    pub const ALL: &'static [GenomeAssembly] = &[GenomeAssembly::Hg19, GenomeAssembly::Hg38];
}

impl Default for GenomeAssembly {
    fn default() -> Self {
        GenomeAssembly::Hg19
    }
}

impl fmt::Display for GenomeAssembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenomeAssembly::Hg19 => write!(f, "hg19"),
            GenomeAssembly::Hg38 => write!(f, "hg38"),
        }
    }
}

impl FromStr for GenomeAssembly {
    type Err = String;

    /// Accepts UCSC and GRC names case-insensitively, an empty string means hg19
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "hg19" | "hg37" | "grch37" => Ok(GenomeAssembly::Hg19),
            "hg38" | "grch38" => Ok(GenomeAssembly::Hg38),
            _ => Err(s.to_string()),
        }
    }
}
