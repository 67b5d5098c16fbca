mod analysis;
mod config;
mod error;
mod ingest;
mod model;
mod results;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::config::{Config, ConfigOverrides};
use crate::ingest::WordSet;
use crate::model::EmbeddingModel;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Score Divergent Association Task word lists from CSV or XLSX files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Optional path to a configuration TOML file overriding defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the word embedding model (GloVe-style text file)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Cell separator for CSV input files
    #[arg(long)]
    separator: Option<char>,

    /// Identifier column, as a zero-based index or a column name
    #[arg(long = "id-column")]
    id_column: Option<String>,

    /// Ignore any identifier column and generate a fresh ID per row
    #[arg(long)]
    synthesize_ids: bool,

    /// Number of words used per list when computing DAT scores
    #[arg(long = "minimum-words")]
    minimum_words: Option<usize>,

    /// Directory for result files
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read word lists, compute DAT scores, and write a dated result CSV
    Score(ScoreArgs),
    /// Read word lists and print them without scoring, to check input settings
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Input file (.csv or .xlsx)
    input: PathBuf,

    /// Print scores without writing a result file
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    /// Input file (.csv or .xlsx)
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let overrides = ConfigOverrides {
        model_path: cli.model.clone(),
        separator: cli.separator,
        id_column: cli.id_column.clone(),
        synthesize_ids: cli.synthesize_ids,
        minimum_words: cli.minimum_words,
        output_dir: cli.output_dir.clone(),
    };
    let config = Config::load(cli.config.clone(), overrides)?;

    match cli.command {
        Command::Score(args) => run_score(args, &config),
        Command::Preview(args) => run_preview(args, &config),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| anyhow::anyhow!("Failed to set tracing subscriber: {err}"))
}

fn run_score(args: ScoreArgs, config: &Config) -> Result<()> {
    let model_path = config.model_path.clone().context(
        "no embedding model configured; pass --model, set model_path in the config file, \
         or set DAT_MODEL",
    )?;
    let model = EmbeddingModel::load(&model_path)?;

    let words = read_input(&args.input, config)?;

    let mut results = Vec::new();
    let mut skipped = 0usize;
    for (id, list) in words.iter() {
        match analysis::score_word_list(list, config.minimum_words, &model) {
            Some(result) => {
                tracing::debug!("scored '{}': {:.2}", id, result.score);
                results.push((id.to_string(), result));
            }
            None => {
                tracing::warn!(
                    "skipping '{}': fewer than {} usable words",
                    id,
                    config.minimum_words
                );
                skipped += 1;
            }
        }
    }

    if results.is_empty() {
        anyhow::bail!(
            "none of the {} word lists had {} usable words",
            words.len(),
            config.minimum_words
        );
    }

    if args.dry_run {
        for (id, result) in &results {
            println!("[DRY RUN] {id}: DAT {:.2}", result.score);
        }
        if skipped > 0 {
            println!("[DRY RUN] {skipped} word list(s) skipped");
        }
        return Ok(());
    }

    let output_path = results::save_results_in(&config.output_dir, &results, config.minimum_words)
        .context("failed to save results")?;
    tracing::info!(
        "scored {} word list(s), skipped {}, wrote {}",
        results.len(),
        skipped,
        output_path.display()
    );

    Ok(())
}

fn run_preview(args: PreviewArgs, config: &Config) -> Result<()> {
    let words = read_input(&args.input, config)?;

    for (id, list) in words.iter() {
        println!("{id}: {}", list.join(", "));
    }
    println!("{} word list(s) read from {}", words.len(), args.input.display());

    Ok(())
}

fn read_input(input: &Path, config: &Config) -> Result<WordSet> {
    let words = ingest::read_data(input, config.separator, &config.id_column)
        .with_context(|| format!("failed to read word lists from {}", input.display()))?;

    if words.is_empty() {
        anyhow::bail!("no data rows found in {}", input.display());
    }

    Ok(words)
}
