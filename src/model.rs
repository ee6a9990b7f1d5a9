//! Domain types shared by pipeline construction and execution

pub mod named;
pub mod assembly;
pub mod effect;
pub mod gene;
pub mod inheritance;
pub mod interval;
pub mod source;
pub mod variant;

use serde::{Deserialize, Serialize};

use gene::Gene;
use variant::Variant;

/// Variants and genes as supplied by ingestion, and as returned after a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    pub genes: Vec<Gene>,
    pub variants: Vec<Variant>,
}
