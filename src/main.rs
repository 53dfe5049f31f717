//! Command-line interface for data-mocker
//!
//! # Usage Examples
//!
//! ## Inference
//! ```bash
//! # Print the descriptor tree of a sample as JSON
//! data-mocker infer --input sample.json
//!
//! # Write it as YAML
//! data-mocker infer --input sample.json --format yaml --out schema.yaml
//! ```
//!
//! ## Generation
//! ```bash
//! # 100 records to stdout, reproducible
//! data-mocker mock --schema schema.yaml --count 100 --seed 42
//!
//! # Append to a JSONL file
//! data-mocker mock --schema schema.yaml --count 100 --output out.jsonl --append
//!
//! # From a declaration file
//! DATA_MOCKER_SEED=7 data-mocker declare --file declaration.yaml --count 5
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use data_mocker::fields::TypeRegistry;
use data_mocker::jsonl::{JsonlOutputArgs, PopulateMetrics};
use data_mocker::{load_sample, DataMocker, Declaration, InferOpts};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "data-mocker")]
#[command(about = "Infer schemas from sample data and generate mock records")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer a descriptor tree from a sample document
    Infer {
        #[command(flatten)]
        opts: InferOpts,
    },

    /// Generate records from a descriptor tree
    Mock {
        /// Descriptor tree file (JSON, or YAML by extension)
        #[arg(long, short = 's')]
        schema: PathBuf,

        #[command(flatten)]
        output: JsonlOutputArgs,
    },

    /// Generate records from a YAML declaration file
    Declare {
        /// Declaration file
        #[arg(long, short = 'f')]
        file: PathBuf,

        #[command(flatten)]
        output: JsonlOutputArgs,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Infer { opts } => run_infer(&opts),
        Commands::Mock { schema, output } => {
            let mocker = DataMocker::from_descriptor_file(&schema)
                .with_context(|| format!("Failed to load schema from {schema:?}"))?;
            emit(mocker, &output)
        }
        Commands::Declare { file, output } => {
            let declaration = Declaration::from_file(&file)
                .with_context(|| format!("Failed to load declaration from {file:?}"))?;
            let mocker = declaration
                .into_mocker(TypeRegistry::builtin())
                .with_context(|| format!("Invalid declaration in {file:?}"))?;
            emit(mocker, &output)
        }
    }
}

fn run_infer(opts: &InferOpts) -> anyhow::Result<()> {
    let sample = load_sample(&opts.input)
        .with_context(|| format!("Failed to load sample from {:?}", opts.input))?;
    let mocker = DataMocker::from_sample(&sample)
        .with_context(|| format!("Failed to infer a schema from {:?}", opts.input))?;
    let rendered = opts.format.render(&mocker.descriptor())?;

    match &opts.out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write descriptor to {path:?}"))?;
            info!("Wrote descriptor tree to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered.trim_end())?;
        }
    }
    Ok(())
}

fn emit(mut mocker: DataMocker, output: &JsonlOutputArgs) -> anyhow::Result<()> {
    if let Some(seed) = output.common.seed {
        mocker = mocker.with_seed(seed);
    }
    let count = output.common.count;
    let mut populator = mocker.into_populator();

    let metrics: PopulateMetrics = match &output.output {
        Some(path) if output.append => populator
            .populate_append(path, count)
            .with_context(|| format!("Failed to append records to {path:?}"))?,
        Some(path) => populator
            .populate(path, count)
            .with_context(|| format!("Failed to write records to {path:?}"))?,
        None => populator
            .write_to(std::io::stdout().lock(), count)
            .context("Failed to write records to stdout")?,
    };

    info!(
        "Generated {} records ({} bytes) in {:?}",
        metrics.rows_written, metrics.bytes_written, metrics.total_duration
    );
    Ok(())
}
