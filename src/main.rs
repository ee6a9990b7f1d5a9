use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use varsift::analysis::translator::JobTranslator;
use varsift::model::assembly::GenomeAssembly;
use varsift::model::WorkingSet;
use varsift::request::message::JobMessage;
use varsift::request::read::get_job_paths;
use varsift::request::schema::load_schema;
use varsift::run::executor::PipelineExecutor;
use varsift::run::factory::StandardStepFactory;
use varsift::service::{DiseaseSource, IdentityOntology, InMemoryDiseases};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A job document (JSON or YAML), or a directory of them
    #[arg(short, long)]
    job: PathBuf,

    /// JSON working set of genes and variants, as produced by ingestion
    #[arg(short, long)]
    variants: Option<PathBuf>,

    /// JSON disease-gene associations keyed by Entrez id, used by the OMIM prioritiser
    #[arg(long)]
    diseases: Option<PathBuf>,

    /// Directory to write annotated results to, one JSON file per job
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Worker threads used within each step
    #[arg(short, long)]
    threads: Option<usize>,

    /// Translate jobs and print the resolved analysis without running it
    #[arg(long)]
    dry_run: bool,

    /// Genome assemblies this instance supports, all of them by default
    #[arg(long, value_enum)]
    assembly: Vec<GenomeAssembly>,
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting varsift");
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Can't configure worker threads")?;
    }

    let supported = match args.assembly.is_empty() {
        true => GenomeAssembly::ALL.iter().copied().collect(),
        false => args.assembly.iter().copied().collect(),
    };
    let translator = JobTranslator::new(Arc::new(IdentityOntology), supported);
    let diseases: Option<Arc<dyn DiseaseSource>> = match &args.diseases {
        Some(path) => Some(Arc::new(read_json::<InMemoryDiseases>(path)?)),
        None => None,
    };

    let paths = match args.job.is_dir() {
        true => get_job_paths(&args.job).with_context(|| format!("Can't list jobs in {}", args.job.display()))?,
        false => vec![args.job.clone()],
    };
    info!("Found {} jobs", paths.len());

    let mut failed = 0;
    for path in &paths {
        if let Err(err) = run_job(path, &args, &translator, diseases.clone()) {
            warn!("Job {} failed: {err:#}", path.display());
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} jobs failed", paths.len());
    }
    info!("finished :)");
    Ok(())
}

fn run_job(path: &Path, args: &Args, translator: &JobTranslator, diseases: Option<Arc<dyn DiseaseSource>>) -> Result<()> {
    let message = JobMessage { path: path.to_path_buf(), compiled_schema: load_schema()? };
    let (job, pipeline) = translator.translate_document(message.read()?)?;
    let sample = translator.parse_sample(&job)?;
    info!("Sample {:?} on {}", sample.proband_id, sample.genome_assembly);

    let variants = match (&args.variants, args.dry_run) {
        (Some(variants), false) => variants,
        (None, false) => {
            warn!("No variants supplied, only translating {}", path.display());
            return print_analysis(&pipeline.to_analysis());
        }
        (_, true) => return print_analysis(&pipeline.to_analysis()),
    };

    let working_set: WorkingSet = read_json(variants)?;
    let mut factory = StandardStepFactory::new().with_hpo_ids(sample.hpo_ids.clone());
    if let Some(diseases) = diseases {
        factory = factory.with_disease_source(diseases);
    }
    let results = PipelineExecutor::new(factory).execute(&pipeline, working_set)?;
    println!("{}", results.report.render()?);

    if let Some(out) = &args.out {
        let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("job");
        let out_path = out.join(format!("{stem}.results.json"));
        info!("Writing results to {}", out_path.display());
        fs::write(&out_path, serde_json::to_string_pretty(&results)?)
            .with_context(|| format!("Can't write results to {}", out_path.display()))?;
    }
    Ok(())
}

fn print_analysis(analysis: &varsift::request::job::AnalysisDoc) -> Result<()> {
    println!("{}", serde_yaml::to_string(analysis)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Can't read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Can't parse {}", path.display()))
}
