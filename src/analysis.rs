//! Turn job descriptions into validated, immutable pipelines

pub mod builder;
pub mod catalog;
pub mod encode;
pub mod options;
pub mod preset;
pub mod settings;
pub mod step;
pub mod translator;
