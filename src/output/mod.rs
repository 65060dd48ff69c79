//! Output sinks: tabular record stream and batch-submission documents.

pub mod batch;
pub mod tabular;
