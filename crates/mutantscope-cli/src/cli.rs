use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mutantscope_ingestion::sources::vep::payload_from_value;
use mutantscope_ranker::Thresholds;
use tracing::info;

use crate::config::Config;
use crate::pipeline::{batch_queries, batch_table, Pipeline};
use crate::report::VariantReport;
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "mutantscope",
    about = "Annotate genomic variants and summarise the evidence for pathogenicity",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, normalise and assess a single variant
    Lookup(LookupArgs),
    /// Assess one variant per line of a file, sequentially
    Batch(BatchArgs),
    /// Assess a saved VEP JSON response without network access
    Summarize(SummarizeArgs),
    /// Print the effective thresholds
    Thresholds(ThresholdArgs),
    /// Start an interactive session
    Repl(ThresholdArgs),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Markdown,
    /// The raw annotation payload, verbatim
    Json,
}

#[derive(Args, Debug, Default)]
struct ThresholdArgs {
    /// Override a threshold, e.g. --threshold cadd_cutoff=25 (repeatable)
    #[arg(long = "threshold", value_name = "NAME=VALUE")]
    thresholds: Vec<String>,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Genomic HGVS notation, e.g. 17:g.7675088C>T
    hgvs: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Fetch title and abstract for linked publications
    #[arg(long)]
    articles: bool,
    #[command(flatten)]
    overrides: ThresholdArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// File with one HGVS notation per line
    file: PathBuf,
    #[command(flatten)]
    overrides: ThresholdArgs,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Saved VEP REST response (JSON array)
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    overrides: ThresholdArgs,
}

/// Configured thresholds with command-line overrides applied in order.
fn effective_thresholds(config: &Config, args: &ThresholdArgs) -> anyhow::Result<Thresholds> {
    let mut thresholds = config.thresholds.clone();
    for assignment in &args.thresholds {
        thresholds
            .apply(assignment)
            .with_context(|| format!("--threshold {}", assignment))?;
    }
    Ok(thresholds)
}

pub(crate) async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Lookup(args) => {
            let thresholds = effective_thresholds(&config, &args.overrides)?;
            let pipeline = Pipeline::from_config(&config)?;
            let report = pipeline.lookup(&args.hgvs, &thresholds, args.articles).await?;
            emit(&report, &config, args.format, args.output.as_ref()).await
        }
        Command::Batch(args) => {
            let thresholds = effective_thresholds(&config, &args.overrides)?;
            let text = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let queries = batch_queries(&text);
            info!(count = queries.len(), file = %args.file.display(), "Starting batch");

            let pipeline = Pipeline::from_config(&config)?;
            let outcomes = pipeline.run_batch(&queries, &thresholds).await;
            println!("{}", batch_table(&outcomes));
            Ok(())
        }
        Command::Summarize(args) => {
            let thresholds = effective_thresholds(&config, &args.overrides)?;
            let text = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
            let query = args.file.display().to_string();
            let report = VariantReport::build(&query, payload_from_value(value)?, &thresholds)?;
            emit(&report, &config, args.format, args.output.as_ref()).await
        }
        Command::Thresholds(args) => {
            let thresholds = effective_thresholds(&config, &args)?;
            for (name, value) in thresholds.entries() {
                println!("{:<18} {}", name, value);
            }
            Ok(())
        }
        Command::Repl(args) => {
            let thresholds = effective_thresholds(&config, &args)?;
            let pipeline = Pipeline::from_config(&config)?;
            crate::repl::run(&pipeline, &config.display, Session::new(thresholds)).await
        }
    }
}

async fn emit(
    report: &VariantReport,
    config: &Config,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let body = match format {
        OutputFormat::Text => report.render_text(&config.display),
        OutputFormat::Markdown => report.render_markdown(&config.display),
        OutputFormat::Json => report.raw_json()?,
    };
    match output {
        Some(path) => {
            tokio::fs::write(path, &body)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", body),
    }
    Ok(())
}
