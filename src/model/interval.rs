use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A closed genomic interval on a single chromosome, 1-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticInterval {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl GeneticInterval {
    pub fn new(chromosome: &str, start: u64, end: u64) -> Result<Self, String> {
        let chromosome = normalise_chromosome(chromosome)?;
        if start > end {
            return Err(format!("start {start} is after end {end}"));
        }
        Ok(GeneticInterval { chromosome, start, end })
    }

    /// Expects a chromosome already passed through [`normalise_chromosome`]
    pub fn covers(&self, chromosome: &str, position: u64) -> bool {
        chromosome == self.chromosome && self.start <= position && position <= self.end
    }
}

impl FromStr for GeneticInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chromosome, range) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| "missing ':' between chromosome and range".to_string())?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| "missing '-' between start and end".to_string())?;
        let start = start
            .parse::<u64>()
            .map_err(|_| format!("start '{start}' is not a position"))?;
        let end = end
            .parse::<u64>()
            .map_err(|_| format!("end '{end}' is not a position"))?;
        GeneticInterval::new(chromosome, start, end)
    }
}

impl fmt::Display for GeneticInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chr{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Strip any `chr` prefix and map MT to M. Only the human nuclear and mitochondrial contigs are valid.
pub fn normalise_chromosome(chromosome: &str) -> Result<String, String> {
    let upper = chromosome.trim().to_ascii_uppercase();
    let name = upper.strip_prefix("CHR").unwrap_or(&upper);
    match name {
        "X" | "Y" | "M" => Ok(name.to_string()),
        "MT" => Ok("M".to_string()),
        _ => match name.parse::<u8>() {
            Ok(n) if (1..=22).contains(&n) => Ok(n.to_string()),
            _ => Err(format!("unknown chromosome '{chromosome}'")),
        },
    }
}
