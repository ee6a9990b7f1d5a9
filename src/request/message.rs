use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::analysis::catalog::StepKind;
use crate::error::JobReadError;
use crate::request::job::JobDocument;

/// A job document on disk, read as YAML or JSON depending on its extension
pub struct JobMessage {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl JobMessage {
    pub fn read(&self) -> Result<JobDocument, JobReadError> {
        let json: Value = self.parse_untyped()?;

        match validate(&self.compiled_schema, &json).and_then(|_| check_step_parameters(&json)) {
            Ok(_) => {
                info!("Job is valid");
                parse_json(json)
            }
            Err(err) => {
                warn!("Job fails validation");
                Err(err)
            }
        }
    }

    fn read_file(&self) -> Result<String, JobReadError> {
        let path: &Path = self.path.as_path();
        info!("Reading job at {}", path.display());
        fs::read_to_string(path).map_err(|err| {
            warn!("Can't read job at path {}: {}", path.display(), err);
            JobReadError::Read { path: path.to_path_buf(), source: err }
        })
    }

    fn parse_untyped(&self) -> Result<Value, JobReadError> {
        let text = self.read_file()?;
        let is_yaml = matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yml") | Some("yaml")
        );
        parse_untyped(&text, is_yaml)
    }
}

/// Parse text into an untyped structure, YAML being a superset of JSON
pub fn parse_untyped(text: &str, is_yaml: bool) -> Result<Value, JobReadError> {
    info!("Parsing job into untyped structure");
    match is_yaml {
        true => serde_yaml::from_str::<Value>(text).map_err(|err| JobReadError::Decode(err.to_string())),
        false => serde_json::from_str::<Value>(text).map_err(|err| JobReadError::Decode(err.to_string())),
    }
}

pub fn validate(schema: &JSONSchema, json: &Value) -> Result<(), JobReadError> {
    info!("Validating raw job against JSON schema");
    schema.validate(json).map_err(|errors| {
        let messages: Vec<String> = errors
            .map(|err| format!("{} at '{}'", err, err.instance_path))
            .collect();
        JobReadError::Validation(messages)
    })
}

/// Step parameters are free-form objects in the schema, so their names are checked here
pub fn check_step_parameters(json: &Value) -> Result<(), JobReadError> {
    let Some(steps) = json.pointer("/analysis/steps").and_then(Value::as_array) else {
        return Ok(());
    };
    let mut messages = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let Some(step) = step.as_object() else { continue };
        for (name, parameters) in step {
            let (Ok(kind), Some(parameters)) = (name.parse::<StepKind>(), parameters.as_object()) else {
                continue;
            };
            if let Err(err) = kind.check_parameter_names(parameters.keys().map(String::as_str)) {
                messages.push(format!("{err} at '/analysis/steps/{index}/{name}'"));
            }
        }
    }
    match messages.is_empty() {
        true => Ok(()),
        false => Err(JobReadError::Validation(messages)),
    }
}

pub fn parse_json(value: Value) -> Result<JobDocument, JobReadError> {
    info!("Deserialising valid job into typed Rust object");
    serde_json::from_value::<JobDocument>(value).map_err(|err| JobReadError::Deserialisation(err.to_string()))
}

/// Validate and deserialise a job held in memory
pub fn read_str(schema: &JSONSchema, text: &str, is_yaml: bool) -> Result<JobDocument, JobReadError> {
    let json = parse_untyped(text, is_yaml)?;
    validate(schema, &json)?;
    check_step_parameters(&json)?;
    parse_json(json)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::request::schema::load_schema;

    #[test]
    fn reads_yaml_job_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "sample:\n  vcf: /data/sample.vcf.gz\n  hpoIds: ['HP:0001156']\npreset: genome").unwrap();
        let message = JobMessage { path: file.path().to_path_buf(), compiled_schema: load_schema().unwrap() };

        let job = message.read().unwrap();
        assert_eq!(job.preset.as_deref(), Some("genome"));
        assert_eq!(job.sample.unwrap().hpo_ids, vec!["HP:0001156".to_string()]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let message = JobMessage { path: PathBuf::from("/no/such/job.json"), compiled_schema: load_schema().unwrap() };
        assert!(matches!(message.read(), Err(JobReadError::Read { .. })));
    }

    #[test]
    fn invalid_analysis_mode_fails_validation() {
        let schema = load_schema().unwrap();
        let result = read_str(&schema, r#"{"analysis": {"analysisMode": "EVERYTHING"}}"#, false);
        assert!(matches!(result, Err(JobReadError::Validation(_))));
    }

    #[test]
    fn misspelt_step_parameter_fails_validation() {
        let schema = load_schema().unwrap();
        let job = "sample: {vcf: /data/sample.vcf}\nanalysis:\n  steps:\n    - qualityFilter: {minQualty: 50.0}\n";
        match read_str(&schema, job, true) {
            Err(JobReadError::Validation(messages)) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("does not accept minQualty"));
                assert!(messages[0].contains("minQuality (required)"));
                assert!(messages[0].ends_with("at '/analysis/steps/0/qualityFilter'"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let schema = load_schema().unwrap();
        assert!(matches!(read_str(&schema, "{", false), Err(JobReadError::Decode(_))));
    }
}
