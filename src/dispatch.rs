//! Concurrent task dispatch with bounded worker capacity.
//!
//! Tasks run through the retry engine as a `buffer_unordered` stream.
//! Completion order is whatever the provider latencies make it; each
//! outcome is written into the slot matching its task index, so the
//! returned run result is always in canonical entity-major order.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::info;

use crate::domain::outcome::{Outcome, RunResult};
use crate::domain::schema::Schema;
use crate::domain::task::Task;
use crate::engine::{resolve, RetryPolicy};
use crate::provider::Provider;
use crate::template::TemplatePair;

/// Execute all tasks and reassemble outcomes in canonical order.
///
/// One task's failure never blocks or aborts the others. `on_complete`
/// fires once per finished task, in completion order, for progress
/// reporting.
pub async fn run<F>(
    tasks: Vec<Task>,
    pairs: &[TemplatePair],
    provider: Arc<dyn Provider>,
    schema: Arc<Schema>,
    policy: RetryPolicy,
    workers: usize,
    on_complete: F,
) -> RunResult
where
    F: Fn(&Outcome),
{
    let total = tasks.len();
    info!(tasks = total, workers, provider = provider.name(), "Dispatching tasks");

    let futures = tasks.into_iter().map(|task| {
        let provider = Arc::clone(&provider);
        let schema = Arc::clone(&schema);
        let policy = policy.clone();
        // Pair lookup is by index; expansion guarantees it is in range.
        let pair = pairs[task.pair_index].clone();
        async move {
            let index = task.index;
            let outcome = match pair.render(&task.entity) {
                Ok(prompt) => {
                    resolve(task, &prompt, provider.as_ref(), &schema, &policy).await
                }
                // A template defect cannot be fixed by retrying.
                Err(err) => Outcome::from_template_failure(task, &err),
            };
            (index, outcome)
        }
    });

    let mut slots: Vec<Option<Outcome>> = (0..total).map(|_| None).collect();
    let mut completed = stream::iter(futures).buffer_unordered(workers.max(1));
    while let Some((index, outcome)) = completed.next().await {
        on_complete(&outcome);
        debug_assert!(slots[index].is_none(), "outcome produced twice for task {index}");
        slots[index] = Some(outcome);
    }

    let outcomes: Vec<Outcome> = slots.into_iter().flatten().collect();
    debug_assert_eq!(outcomes.len(), total, "every task must yield one outcome");

    let result = RunResult::new(outcomes);
    info!(
        successes = result.success_count(),
        failures = result.failure_count(),
        "Dispatch complete"
    );
    result
}
