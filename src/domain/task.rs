//! Query tasks: the cross product of entities, models and template pairs.

use crate::domain::entity::Entity;
use crate::error::{ConfigError, Result};
use crate::template::TemplatePair;

/// One query unit: (entity, model, template pair).
///
/// `index` is the task's position in the canonical entity-major ordering
/// and correlates the task to its output slot regardless of completion
/// order under concurrency.
#[derive(Debug, Clone)]
pub struct Task {
    pub index: usize,
    pub entity: Entity,
    pub model: String,
    pub pair_index: usize,
}

impl Task {
    /// Stable correlation id, used as `custom_id` in batch documents.
    pub fn correlation_id(&self) -> String {
        format!(
            "{}|{}|{}",
            self.entity.name.as_str().replace(' ', "_"),
            self.model,
            self.pair_index
        )
    }
}

/// Expand the full task set in canonical order: entity-major, then model,
/// then template pair, preserving input order within each dimension.
///
/// # Errors
///
/// Returns a configuration error if any of the three collections is empty.
pub fn expand(
    entities: &[Entity],
    models: &[String],
    pairs: &[TemplatePair],
) -> Result<Vec<Task>> {
    if entities.is_empty() {
        return Err(ConfigError::EmptyInput { what: "entities" }.into());
    }
    if models.is_empty() {
        return Err(ConfigError::EmptyInput { what: "models" }.into());
    }
    if pairs.is_empty() {
        return Err(ConfigError::EmptyInput {
            what: "template pairs",
        }
        .into());
    }

    let mut tasks = Vec::with_capacity(entities.len() * models.len() * pairs.len());
    for entity in entities {
        for model in models {
            for pair_index in 0..pairs.len() {
                tasks.push(Task {
                    index: tasks.len(),
                    entity: entity.clone(),
                    model: model.clone(),
                    pair_index,
                });
            }
        }
    }
    Ok(tasks)
}
