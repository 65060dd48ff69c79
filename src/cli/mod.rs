//! Command-line interface definitions.

pub mod by_list;
pub mod by_name;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Host;
use crate::error::Result;

/// Phenoprobe - Microbial phenotype prediction via LLM queries.
#[derive(Parser, Debug)]
#[command(name = "phenoprobe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict phenotypes for every binomial name in an input list
    ByList(ByListArgs),

    /// Predict phenotypes for a single binomial name
    ByName(ByNameArgs),
}

/// Provider host selection on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum HostArg {
    Openrouter,
    Openai,
}

impl From<HostArg> for Host {
    fn from(arg: HostArg) -> Self {
        match arg {
            HostArg::Openrouter => Host::OpenRouter,
            HostArg::Openai => Host::OpenAi,
        }
    }
}

/// Arguments for the `by-list` subcommand.
#[derive(Parser, Debug)]
pub struct ByListArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Models to query, one task set per model
    #[arg(long, num_args = 1.., default_value = "openai/chatgpt-4o-latest")]
    pub model: Vec<String>,

    /// Provider host (overrides config)
    #[arg(long)]
    pub model_host: Option<HostArg>,

    /// System message template files, zipped with --user-template
    #[arg(long, num_args = 1.., required = true)]
    pub system_template: Vec<PathBuf>,

    /// User message template files, zipped with --system-template
    #[arg(long, num_args = 1.., required = true)]
    pub user_template: Vec<PathBuf>,

    /// Input CSV file (';' delimited) with one row per instance
    #[arg(long)]
    pub input: PathBuf,

    /// Column holding the binomial names
    #[arg(long, default_value = "Binomial.name")]
    pub column_name: String,

    /// Output file for predictions (appended when it exists)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of parallel workers (overrides config)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Sampling temperature (overrides config)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Retry attempt budget per task (overrides config)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Substitute gene lists into the *_with_genes template variants
    #[arg(long)]
    pub use_genes: bool,

    /// Column holding per-row gene file paths
    #[arg(long, default_value = "Gene_file")]
    pub gene_column: String,

    /// Write a batch-submission JSONL document instead of querying
    #[arg(long)]
    pub batch_output: bool,

    /// Schema TOML file (defaults to the stock phenotype schema)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `by-name` subcommand.
#[derive(Parser, Debug)]
pub struct ByNameArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Binomial name to classify, e.g. 'Escherichia coli'
    #[arg(long)]
    pub binomial_name: String,

    /// Models to query
    #[arg(long, num_args = 1.., default_value = "openai/chatgpt-4o-latest")]
    pub model: Vec<String>,

    /// Provider host (overrides config)
    #[arg(long)]
    pub model_host: Option<HostArg>,

    /// System message template file
    #[arg(long)]
    pub system_template: PathBuf,

    /// User message template file
    #[arg(long)]
    pub user_template: PathBuf,

    /// Output file for the prediction row (appended when it exists)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Schema TOML file (defaults to the stock phenotype schema)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Dispatch the parsed command to its handler.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ByList(args) => by_list::execute(args).await,
        Commands::ByName(args) => by_name::execute(args).await,
    }
}
