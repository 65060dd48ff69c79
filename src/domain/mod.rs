//! Domain types: entities, tasks, the phenotype schema, and outcomes.

pub mod entity;
pub mod outcome;
pub mod schema;
pub mod task;

pub use entity::{BinomialName, Entity};
pub use outcome::{FailureKind, Outcome, RunResult};
pub use schema::{stock_schema, FieldDomain, FieldSpec, FieldValue, Record, Schema};
pub use task::{expand, Task};
