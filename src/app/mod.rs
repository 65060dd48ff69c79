//! Application layer: wires expansion, dispatch and output together.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch;
use crate::domain::entity::Entity;
use crate::domain::outcome::{Outcome, RunResult};
use crate::domain::schema::Schema;
use crate::domain::task;
use crate::engine::RetryPolicy;
use crate::error::Result;
use crate::output::{batch, tabular};
use crate::provider;
use crate::template::TemplatePair;

/// Everything one run needs beyond the process-wide [`Config`].
pub struct RunSpec {
    pub entities: Vec<Entity>,
    pub models: Vec<String>,
    pub pairs: Vec<TemplatePair>,
    pub schema: Schema,
    pub output: PathBuf,
    pub mode: OutputMode,
}

/// Output encoding, selected per run and never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Tabular,
    Batch,
}

/// What a run produced.
pub enum RunOutput {
    /// Tasks were executed; one outcome per task, canonical order.
    Executed(RunResult),
    /// Batch mode: request documents were written, nothing executed.
    BatchWritten { requests: usize },
}

/// Main application struct.
pub struct App;

impl App {
    /// Run the full pipeline for a prepared [`RunSpec`].
    ///
    /// `on_complete` fires once per finished task in completion order
    /// (tabular mode only); batch mode bypasses execution entirely.
    pub async fn run<F>(config: &Config, spec: RunSpec, on_complete: F) -> Result<RunOutput>
    where
        F: Fn(&Outcome),
    {
        let tasks = task::expand(&spec.entities, &spec.models, &spec.pairs)?;
        info!(
            entities = spec.entities.len(),
            models = spec.models.len(),
            template_pairs = spec.pairs.len(),
            tasks = tasks.len(),
            "Expanded task cross product"
        );

        match spec.mode {
            OutputMode::Batch => {
                batch::write_batch(&spec.output, &tasks, &spec.pairs, &config.provider)?;
                info!(
                    requests = tasks.len(),
                    output = %spec.output.display(),
                    "Batch submission document written"
                );
                Ok(RunOutput::BatchWritten {
                    requests: tasks.len(),
                })
            }
            OutputMode::Tabular => {
                if spec.output.exists() {
                    warn!(
                        output = %spec.output.display(),
                        "Output file exists, new rows will be appended"
                    );
                }
                let client = provider::from_config(&config.provider)?;
                let policy = RetryPolicy::from_config(&config.retry);
                let schema = Arc::new(spec.schema);

                let result = dispatch::run(
                    tasks,
                    &spec.pairs,
                    client,
                    Arc::clone(&schema),
                    policy,
                    config.run.workers,
                    on_complete,
                )
                .await;

                tabular::write_rows(&spec.output, result.outcomes(), &spec.pairs, &schema)?;
                info!(
                    rows = result.len(),
                    successes = result.success_count(),
                    failures = result.failure_count(),
                    output = %spec.output.display(),
                    "Run complete"
                );
                Ok(RunOutput::Executed(result))
            }
        }
    }
}
