//! Phenoprobe - Microbial phenotype prediction via LLM queries.
//!
//! This crate expands a cross product of {binomial names} x {models} x
//! {prompt template pairs} into query tasks, dispatches them concurrently
//! against an LLM provider, retries transport failures and schema-invalid
//! responses within a bounded attempt budget, and aggregates the outcomes
//! into a deterministic record stream.
//!
//! # Architecture
//!
//! - [`domain`] - Entities, tasks, the phenotype schema and outcomes
//! - [`template`] - Prompt template loading and placeholder rendering
//! - [`provider`] - Provider clients ([`provider::Provider`] trait with
//!   OpenRouter and OpenAI adapters)
//! - [`validate`] - Balanced-JSON extraction and schema validation
//! - [`engine`] - Bounded retry-and-validate resolution of one task
//! - [`dispatch`] - Concurrent execution with canonical output ordering
//! - [`output`] - Tabular and batch-submission sinks
//! - [`config`] - TOML configuration and logging setup
//! - [`app`] - Run orchestration tying the pipeline together
//!
//! # Example
//!
//! ```no_run
//! use phenoprobe::domain::{expand, Entity, BinomialName};
//! use phenoprobe::template::TemplatePair;
//!
//! let entities = vec![Entity::new(
//!     BinomialName::parse("Escherichia coli").unwrap(),
//! )];
//! let models = vec!["openai/gpt-4o".to_string()];
//! let pairs = vec![TemplatePair::new("t", "system", "Classify {binomial_name}.")];
//! let tasks = expand(&entities, &models, &pairs).unwrap();
//! assert_eq!(tasks.len(), 1);
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod provider;
pub mod template;
pub mod validate;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
