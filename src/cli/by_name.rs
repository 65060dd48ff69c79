//! Handler for the `by-name` command: a single synchronous query.

use owo_colors::OwoColorize;

use crate::app::{App, OutputMode, RunOutput, RunSpec};
use crate::cli::ByNameArgs;
use crate::config::Config;
use crate::domain::entity::{BinomialName, Entity};
use crate::domain::outcome::Outcome;
use crate::domain::schema::{stock_schema, Schema};
use crate::error::{ConfigError, Result};
use crate::template::TemplatePair;

/// Execute the by-name command.
pub async fn execute(args: ByNameArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(host) = args.model_host {
        config.provider.host = host.into();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    config.init_logging();

    let name = BinomialName::parse(&args.binomial_name).ok_or_else(|| {
        ConfigError::InvalidValue {
            field: "binomial_name",
            reason: format!("'{}' is not a two-word binomial name", args.binomial_name),
        }
    })?;

    let pair = TemplatePair::load(&args.system_template, &args.user_template)?;
    let schema = match &args.schema {
        Some(path) => Schema::load(path)?,
        None => stock_schema(),
    };

    let spec = RunSpec {
        entities: vec![Entity::new(name)],
        models: args.model.clone(),
        pairs: vec![pair],
        schema: schema.clone(),
        output: args.output.clone(),
        mode: OutputMode::Tabular,
    };

    let output = App::run(&config, spec, |_| {}).await?;
    let RunOutput::Executed(result) = output else {
        return Ok(());
    };

    for outcome in result.outcomes() {
        print_outcome(outcome, &schema);
    }
    Ok(())
}

/// Pretty-print one outcome to the console.
fn print_outcome(outcome: &Outcome, schema: &Schema) {
    let task = outcome.task();
    println!("\n{}", "Prediction Results".bold());
    println!("{}", "=".repeat(40));
    println!("{}: {}", "Binomial name".bold(), task.entity.name);
    println!("{}: {}", "Model".bold(), task.model);
    match outcome {
        Outcome::Success { record, .. } => {
            for field in schema.field_names() {
                if let Some(value) = record.get(field) {
                    println!("{field}: {}", value.to_cell());
                }
            }
        }
        Outcome::Failure {
            kind,
            reason,
            attempts,
            ..
        } => {
            println!(
                "{} after {attempts} attempts ({}): {reason}",
                "Prediction failed".red(),
                kind.as_str()
            );
        }
    }
    println!("{}", "=".repeat(40));
}
