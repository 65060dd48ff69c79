//! Per-task outcomes and the aggregated run result.

use crate::domain::schema::Record;
use crate::domain::task::Task;
use crate::error::{TemplateError, TransportError, ValidationError};

/// Why a task terminally failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider unreachable, auth failure, rate limit, non-2xx.
    Transport,
    /// Response parsed but did not match the schema.
    Validation,
    /// Unresolvable template placeholder; never retried.
    Template,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Validation => "validation",
            FailureKind::Template => "template",
        }
    }
}

/// Terminal result of resolving one task. Produced exactly once per task.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success {
        task: Task,
        record: Record,
        attempts: u32,
    },
    Failure {
        task: Task,
        kind: FailureKind,
        reason: String,
        attempts: u32,
        last_response: Option<String>,
    },
}

impl Outcome {
    pub fn task(&self) -> &Task {
        match self {
            Outcome::Success { task, .. } | Outcome::Failure { task, .. } => task,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Build a failure outcome from the last error of a retry sequence.
    pub fn from_transport_failure(task: Task, err: &TransportError, attempts: u32) -> Self {
        Outcome::Failure {
            task,
            kind: FailureKind::Transport,
            reason: err.to_string(),
            attempts,
            last_response: None,
        }
    }

    pub fn from_validation_failure(
        task: Task,
        err: &ValidationError,
        attempts: u32,
        last_response: String,
    ) -> Self {
        Outcome::Failure {
            task,
            kind: FailureKind::Validation,
            reason: err.to_string(),
            attempts,
            last_response: Some(last_response),
        }
    }

    pub fn from_template_failure(task: Task, err: &TemplateError) -> Self {
        Outcome::Failure {
            task,
            kind: FailureKind::Template,
            reason: err.to_string(),
            attempts: 0,
            last_response: None,
        }
    }
}

/// Ordered outcome sequence covering the full task cross product.
#[derive(Debug)]
pub struct RunResult {
    outcomes: Vec<Outcome>,
}

impl RunResult {
    /// Wrap collected outcomes, asserting canonical order and completeness.
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        debug_assert!(outcomes
            .iter()
            .enumerate()
            .all(|(i, o)| o.task().index == i));
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{BinomialName, Entity};

    fn task(index: usize) -> Task {
        Task {
            index,
            entity: Entity::new(BinomialName::parse("Escherichia coli").unwrap()),
            model: "stub-model".to_string(),
            pair_index: 0,
        }
    }

    #[test]
    fn failure_kind_labels() {
        assert_eq!(FailureKind::Transport.as_str(), "transport");
        assert_eq!(FailureKind::Validation.as_str(), "validation");
        assert_eq!(FailureKind::Template.as_str(), "template");
    }

    #[test]
    fn run_result_counts_successes_and_failures() {
        let outcomes = vec![
            Outcome::Success {
                task: task(0),
                record: Record::new(),
                attempts: 1,
            },
            Outcome::Failure {
                task: task(1),
                kind: FailureKind::Validation,
                reason: "missing field: motility".to_string(),
                attempts: 4,
                last_response: Some("{}".to_string()),
            },
        ];
        let result = RunResult::new(outcomes);
        assert_eq!(result.len(), 2);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
    }
}
