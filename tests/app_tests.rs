//! Application-level wiring: expansion errors and batch generation.

use phenoprobe::app::{App, OutputMode, RunOutput, RunSpec};
use phenoprobe::config::Config;
use phenoprobe::domain::schema::stock_schema;
use phenoprobe::error::{ConfigError, Error};
use phenoprobe::testkit::{entity, template_pair};

fn batch_spec(dir: &tempfile::TempDir, models: Vec<String>) -> RunSpec {
    RunSpec {
        entities: vec![entity("Escherichia coli"), entity("Bacillus subtilis")],
        models,
        pairs: vec![template_pair("t1")],
        schema: stock_schema(),
        output: dir.path().join("batch.jsonl"),
        mode: OutputMode::Batch,
    }
}

#[tokio::test]
async fn batch_mode_writes_documents_without_executing() {
    let dir = tempfile::tempdir().unwrap();
    let spec = batch_spec(&dir, vec!["openai/gpt-4o".to_string()]);
    let output_path = spec.output.clone();

    let output = App::run(&Config::default(), spec, |_| {}).await.unwrap();

    match output {
        RunOutput::BatchWritten { requests } => assert_eq!(requests, 2),
        RunOutput::Executed(_) => panic!("batch mode must not execute"),
    }
    let content = std::fs::read_to_string(output_path).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[tokio::test]
async fn batch_mode_rejects_two_models() {
    let dir = tempfile::tempdir().unwrap();
    let spec = batch_spec(
        &dir,
        vec!["openai/gpt-4o".to_string(), "openai/gpt-4o-mini".to_string()],
    );
    let output_path = spec.output.clone();

    let result = App::run(&Config::default(), spec, |_| {}).await;

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MultiModelBatch { count: 2 }))
    ));
    assert!(!output_path.exists(), "no document may be emitted");
}

#[tokio::test]
async fn empty_entity_list_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let spec = RunSpec {
        entities: vec![],
        models: vec!["openai/gpt-4o".to_string()],
        pairs: vec![template_pair("t1")],
        schema: stock_schema(),
        output: dir.path().join("out.csv"),
        mode: OutputMode::Tabular,
    };

    let result = App::run(&Config::default(), spec, |_| {}).await;
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::EmptyInput { what: "entities" }))
    ));
}
