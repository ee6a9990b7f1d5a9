use std::sync::Arc;

use anyhow::anyhow;
use jsonschema::{JSONSchema, SchemaResolver, SchemaResolverError};
use log::debug;
use serde_json::Value;
use url::Url;

use crate::error::JobReadError;

static JOB_SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/job.json"));
static SAMPLE_SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/sample.json"));
static ANALYSIS_SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/analysis.json"));

/// Compile the embedded job schema, resolving its relative references to the other embedded files
pub fn load_schema() -> Result<JSONSchema, JobReadError> {
    let schema_json = parse_embedded(JOB_SCHEMA)?;
    compile_schema(&schema_json)
}

fn parse_embedded(schema: &str) -> Result<Value, JobReadError> {
    serde_json::from_str(schema).map_err(|err| JobReadError::Schema(err.to_string()))
}

fn compile_schema(schema: &Value) -> Result<JSONSchema, JobReadError> {
    JSONSchema::options()
        .with_resolver(EmbeddedResolver)
        .compile(schema)
        .map_err(|err| JobReadError::Schema(err.to_string()))
}

/*
The job schema refers to its parts with relative references (e.g. "sample.json"), which resolve
against the default json-schema:/// base. Those parts are embedded in the binary, so no file or
network access is needed.
*/
struct EmbeddedResolver;

impl SchemaResolver for EmbeddedResolver {
    fn resolve(&self, _root_schema: &Value, url: &Url, original_reference: &str) -> Result<Arc<Value>, SchemaResolverError> {
        match url.scheme() {
            "json-schema" => {
                let name = original_reference.split('#').next().unwrap_or_default();
                debug!("Resolving embedded schema {name}");
                let schema = match name {
                    "sample.json" => SAMPLE_SCHEMA,
                    "analysis.json" => ANALYSIS_SCHEMA,
                    "job.json" => JOB_SCHEMA,
                    _ => return Err(anyhow!("no embedded schema called {name}")),
                };
                Ok(Arc::new(serde_json::from_str(schema)?))
            }
            _ => Err(anyhow!("scheme is not supported")),
        }
    }
}
