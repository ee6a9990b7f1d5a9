use chrono::{DateTime, Utc};
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::analysis::catalog::StepKind;
use crate::analysis::settings::AnalysisMode;

/// Counters and messages for one step. Counts are observational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub kind: StepKind,
    pub before: usize,
    pub after: usize,
    pub messages: Vec<String>,
    /// the step could not be created and didn't run
    pub skipped: bool,
}

impl StepResult {
    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub analysis_mode: AnalysisMode,
    pub steps: Vec<StepResult>,
    pub total_variants: usize,
    pub passing_variants: usize,
    pub total_genes: usize,
    pub passing_genes: usize,
}

/// Rendering context for the report
#[derive(Serialize)]
struct ReportContext {
    time_now: String,
    analysis_mode: String,
    total_variants: usize,
    passing_variants: usize,
    total_genes: usize,
    passing_genes: usize,
    steps: Vec<StepContext>,
}

#[derive(Serialize)]
struct StepContext {
    index: usize,
    name: &'static str,
    before: usize,
    after: usize,
    skipped: bool,
    messages: Vec<String>,
}

impl RunReport {
    pub fn new(analysis_mode: AnalysisMode) -> Self {
        RunReport {
            analysis_mode,
            steps: Vec::new(),
            total_variants: 0,
            passing_variants: 0,
            total_genes: 0,
            passing_genes: 0,
        }
    }

    pub fn push(&mut self, result: StepResult) {
        self.steps.push(result);
    }

    pub fn render(&self) -> Result<String, tinytemplate::error::Error> {
        self.render_at(Utc::now())
    }

    /// Render the plain text report using TinyTemplate
    pub fn render_at(&self, time_now: DateTime<Utc>) -> Result<String, tinytemplate::error::Error> {
        /// included report template
        static REPORT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/report.txt"));
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        tt.add_template("report", REPORT)?;

        let context = ReportContext {
            time_now: time_now.to_string(),
            analysis_mode: self.analysis_mode.to_string(),
            total_variants: self.total_variants,
            passing_variants: self.passing_variants,
            total_genes: self.total_genes,
            passing_genes: self.passing_genes,
            steps: self
                .steps
                .iter()
                .map(|step| StepContext {
                    index: step.index,
                    name: step.name(),
                    before: step.before,
                    after: step.after,
                    skipped: step.skipped,
                    messages: step.messages.clone(),
                })
                .collect(),
        };

        tt.render("report", &context)
    }
}
