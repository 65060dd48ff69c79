use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use phenoprobe::config::{Config, Host};
use phenoprobe::error::{ConfigError, Error};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("phenoprobe-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn loads_full_config() {
    let toml = r#"
[provider]
host = "openai"
temperature = 0.2
max_tokens = 1024
referer = "example.org"

[retry]
max_attempts = 6
backoff_ms = 100
jitter = false

[run]
workers = 16

[logging]
level = "debug"
format = "json"
"#;

    let path = write_temp_config(toml);
    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.provider.host, Host::OpenAi);
    assert_eq!(config.provider.max_tokens, 1024);
    assert_eq!(config.retry.max_attempts, 6);
    assert_eq!(config.run.workers, 16);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn empty_file_yields_defaults() {
    let path = write_temp_config("");
    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.provider.host, Host::OpenRouter);
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.run.workers, 1);
}

#[test]
fn rejects_zero_worker_capacity() {
    let toml = r#"
[run]
workers = 0
"#;
    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "workers", ..
        })) => {}
        other => panic!("expected invalid workers error, got {other:?}"),
    }
}

#[test]
fn rejects_zero_attempt_budget() {
    let toml = r#"
[retry]
max_attempts = 0
"#;
    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_attempts",
            ..
        }))
    ));
}

#[test]
fn rejects_out_of_range_temperature() {
    let toml = r#"
[provider]
temperature = 2.5
"#;
    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "temperature",
            ..
        }))
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let result = Config::load("/nonexistent/phenoprobe.toml");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}
