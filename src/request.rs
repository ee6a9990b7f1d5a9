//! Read job documents from disk
//!
//! A job is parsed into untyped JSON, validated against the embedded JSON schema and only then
//! deserialised into the typed wire structs in [`job`].

pub mod job;
/// Validate and deserialise a single job document
pub mod message;
/// Find job documents in a directory
pub mod read;
/// Compile the embedded JSON schema
pub mod schema;
