//! Binary-level CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn phenoprobe() -> Command {
    Command::cargo_bin("phenoprobe").expect("binary built")
}

#[test]
fn help_lists_subcommands() {
    phenoprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("by-list"))
        .stdout(predicate::str::contains("by-name"));
}

#[test]
fn version_prints_crate_version() {
    phenoprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("phenoprobe"));
}

#[test]
fn by_list_requires_templates() {
    phenoprobe()
        .args(["by-list", "--input", "in.csv", "--output", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--system-template"));
}

#[test]
fn by_list_reports_missing_template_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    std::fs::write(&input, "Binomial.name\nEscherichia coli\n").unwrap();

    phenoprobe()
        .args([
            "by-list",
            "--system-template",
            "/nonexistent/system.txt",
            "--user-template",
            "/nonexistent/user.txt",
            "--input",
        ])
        .arg(&input)
        .args(["--output"])
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read template file"));
}

#[test]
fn by_name_rejects_malformed_binomial_name() {
    let dir = tempfile::tempdir().unwrap();
    let system = dir.path().join("system.txt");
    let user = dir.path().join("user.txt");
    std::fs::write(&system, "Classify microbes.").unwrap();
    std::fs::write(&user, "Classify {binomial_name}.").unwrap();

    phenoprobe()
        .args(["by-name", "--binomial-name", "coli", "--system-template"])
        .arg(&system)
        .arg("--user-template")
        .arg(&user)
        .arg("--output")
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("binomial_name"));
}

#[test]
fn batch_output_runs_without_api_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    let system = dir.path().join("system.txt");
    let user = dir.path().join("user.txt");
    let output = dir.path().join("batch.jsonl");
    std::fs::write(&input, "Binomial.name\nEscherichia coli\n").unwrap();
    std::fs::write(&system, "Classify microbes.").unwrap();
    std::fs::write(&user, "Classify {binomial_name}.").unwrap();

    phenoprobe()
        .args(["by-list", "--batch-output", "--model", "openai/gpt-4o"])
        .arg("--system-template")
        .arg(&system)
        .arg("--user-template")
        .arg(&user)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch file"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
}
