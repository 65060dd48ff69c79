//! Retry-and-validate engine: resolves one task to a terminal outcome.
//!
//! Each attempt is an independent API call followed by schema validation.
//! Transport and validation failures both consume attempts; exhausting the
//! budget yields a `Failure` outcome instead of an error, so one bad task
//! never aborts a run.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::domain::outcome::Outcome;
use crate::domain::schema::Schema;
use crate::domain::task::Task;
use crate::error::{TransportError, ValidationError};
use crate::provider::Provider;
use crate::template::RenderedPrompt;
use crate::validate::validate;

/// Tunable inter-attempt backoff policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.backoff_ms),
            jitter: config.jitter,
        }
    }

    /// Delay before re-issuing after the given failed attempt (1-based).
    fn delay(&self, attempt: u32) -> Duration {
        let base = self.backoff * attempt;
        if !self.jitter || base.is_zero() {
            return base;
        }
        // +/-50% jitter so concurrent workers don't retry in lockstep.
        let millis = base.as_millis() as u64;
        let jittered = rand::thread_rng().gen_range(millis / 2..=millis + millis / 2);
        Duration::from_millis(jittered)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

enum LastError {
    Transport(TransportError),
    Validation(ValidationError, String),
}

/// Resolve one task against the provider, retrying up to the budget.
///
/// A validated response on any attempt returns `Success` immediately;
/// budget exhaustion returns a `Failure` carrying the failure kind, the
/// attempts used and the last raw response (for validation failures).
pub async fn resolve(
    task: Task,
    prompt: &RenderedPrompt,
    provider: &dyn Provider,
    schema: &Schema,
    policy: &RetryPolicy,
) -> Outcome {
    let mut last_error: Option<LastError> = None;
    // Config validation rejects a zero budget, but a hand-built policy
    // must still make at least one attempt.
    let budget = policy.max_attempts.max(1);

    for attempt in 1..=budget {
        match provider
            .submit(&prompt.system, &prompt.user, &task.model)
            .await
        {
            Ok(raw) => match validate(&raw, schema) {
                Ok(record) => {
                    debug!(
                        entity = %task.entity.name,
                        model = %task.model,
                        attempt,
                        "Validated prediction"
                    );
                    return Outcome::Success {
                        task,
                        record,
                        attempts: attempt,
                    };
                }
                Err(err) => {
                    warn!(
                        entity = %task.entity.name,
                        model = %task.model,
                        attempt,
                        max_attempts = budget,
                        error = %err,
                        "Response failed validation, retrying"
                    );
                    last_error = Some(LastError::Validation(err, raw));
                }
            },
            Err(err) => {
                warn!(
                    entity = %task.entity.name,
                    model = %task.model,
                    attempt,
                    max_attempts = budget,
                    error = %err,
                    "Provider request failed, retrying"
                );
                last_error = Some(LastError::Transport(err));
            }
        }

        if attempt < budget {
            tokio::time::sleep(policy.delay(attempt)).await;
        }
    }

    match last_error {
        Some(LastError::Transport(err)) => Outcome::from_transport_failure(task, &err, budget),
        Some(LastError::Validation(err, raw)) => {
            Outcome::from_validation_failure(task, &err, budget, raw)
        }
        None => unreachable!("resolve ran zero attempts"),
    }
}
