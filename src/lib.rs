//! Build and run variant filtering and gene prioritisation pipelines
//!
//! A job document is read and schema-checked by [`request`], translated into an immutable
//! [`analysis::step::PipelineSpec`] by [`analysis`], then executed against a working set of
//! variants and genes by [`run`].

pub mod analysis;
pub mod error;
pub mod model;
pub mod request;
pub mod run;
pub mod sample;
pub mod service;
