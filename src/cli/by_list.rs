//! Handler for the `by-list` command.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::info;

use crate::app::{App, OutputMode, RunOutput, RunSpec};
use crate::cli::ByListArgs;
use crate::config::Config;
use crate::domain::outcome::Outcome;
use crate::domain::schema::{stock_schema, Schema};
use crate::error::{ConfigError, Result};
use crate::input;
use crate::template::{with_genes_variant, TemplatePair};

/// Execute the by-list command.
pub async fn execute(args: ByListArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(host) = args.model_host {
        config.provider.host = host.into();
    }
    if let Some(temperature) = args.temperature {
        config.provider.temperature = temperature;
    }
    if let Some(threads) = args.threads {
        config.run.workers = threads;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.retry.max_attempts = max_attempts;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();

    if args.system_template.len() != args.user_template.len() {
        return Err(ConfigError::MismatchedTemplates {
            system: args.system_template.len(),
            user: args.user_template.len(),
        }
        .into());
    }

    let pairs = load_pairs(&args)?;
    let schema = match &args.schema {
        Some(path) => Schema::load(path)?,
        None => stock_schema(),
    };
    let gene_column = args.use_genes.then_some(args.gene_column.as_str());
    let entities = input::read_entities(&args.input, &args.column_name, gene_column)?;

    info!(
        entities = entities.len(),
        models = args.model.len(),
        template_pairs = pairs.len(),
        "Inputs loaded"
    );

    let mode = if args.batch_output {
        OutputMode::Batch
    } else {
        OutputMode::Tabular
    };
    let spec = RunSpec {
        entities,
        models: args.model.clone(),
        pairs,
        schema,
        output: args.output.clone(),
        mode,
    };

    let total = (spec.entities.len() * spec.models.len() * spec.pairs.len()) as u64;
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    if args.batch_output {
        progress.finish_and_clear();
    }

    let pb = progress.clone();
    let output = App::run(&config, spec, move |outcome: &Outcome| {
        pb.set_message(outcome.task().entity.name.as_str().to_string());
        if let Outcome::Failure { reason, .. } = outcome {
            pb.println(format!(
                "{} {}: {}",
                "failed".red(),
                outcome.task().entity.name,
                reason
            ));
        }
        pb.inc(1);
    })
    .await?;

    match output {
        RunOutput::Executed(result) => {
            progress.finish_with_message("done");
            println!(
                "{} {} rows written to '{}' ({} ok, {} failed)",
                "Finished:".green(),
                result.len(),
                args.output.display(),
                result.success_count(),
                result.failure_count()
            );
        }
        RunOutput::BatchWritten { requests } => {
            println!(
                "Batch file '{}' generated with {} requests for provider upload.",
                args.output.display(),
                requests
            );
        }
    }
    Ok(())
}

/// Zip system and user template files into pairs, switching to the
/// `_with_genes` variants when gene substitution is requested.
fn load_pairs(args: &ByListArgs) -> Result<Vec<TemplatePair>> {
    args.system_template
        .iter()
        .zip(&args.user_template)
        .map(|(system, user)| {
            if args.use_genes {
                TemplatePair::load(&with_genes_variant(system), &with_genes_variant(user))
            } else {
                TemplatePair::load(system, user)
            }
        })
        .collect()
}
