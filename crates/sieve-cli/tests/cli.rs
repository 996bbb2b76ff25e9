//! Runs the `sieve` binary end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn sieve(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sieve"))
        .args(args)
        .env_remove("SIEVE_TABLE")
        .env_remove("SIEVE_CONFIG")
        .output()
        .unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn rules(dir: &TempDir) -> PathBuf {
    write(
        dir,
        "rules.yaml",
        r#"
filters:
  full_name: { operator: eq, value: John Doe, message: wrong name }
  age: { operator: ge, value: 18 }
orders:
  - { field: age, direction: desc }
"#,
    )
}

#[test]
fn sql_prints_query_and_parameters() {
    let dir = TempDir::new().unwrap();
    let rules = rules(&dir);

    let output = sieve(&[
        "sql",
        arg(&rules),
        "--table",
        "users",
        "--columns",
        "id,name",
        "--map",
        "full_name=name",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let (sql, params) = stdout.split_once('\n').unwrap();
    assert_eq!(
        sql,
        "SELECT id, name FROM users WHERE name = :parameter_0 AND age >= :parameter_1 ORDER BY age DESC;"
    );
    let params: serde_json::Value = serde_json::from_str(params).unwrap();
    assert_eq!(
        params,
        serde_json::json!({"parameter_0": "John Doe", "parameter_1": 18})
    );
}

#[test]
fn sql_reads_table_from_config() {
    let dir = TempDir::new().unwrap();
    let rules = rules(&dir);
    let config = write(
        &dir,
        "sieve.yaml",
        "table: people\ncolumn_mapping:\n  full_name: name\n",
    );

    let output = sieve(&["sql", arg(&rules), "--config", arg(&config), "--format", "yaml"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "SELECT * FROM people WHERE name = :parameter_0 AND age >= :parameter_1 ORDER BY age DESC;\nparameter_0: John Doe\nparameter_1: 18\n"
    );
}

#[test]
fn sql_without_table_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let rules = rules(&dir);

    let output = sieve(&["sql", arg(&rules)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No table given"));
}

#[test]
fn check_exit_codes() {
    let dir = TempDir::new().unwrap();
    let rules = rules(&dir);

    let good = write(&dir, "good.json", r#"[{"full_name": "John Doe", "age": 30}]"#);
    let output = sieve(&["check", arg(&rules), arg(&good)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "0: ok\n");

    let mixed = write(
        &dir,
        "mixed.jsonl",
        "{\"full_name\": \"John Doe\", \"age\": 30}\n{\"full_name\": \"Jane\", \"age\": 12}\n",
    );
    let output = sieve(&["check", arg(&rules), arg(&mixed)]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "0: ok\n1: FAIL: wrong name; Field 'age' failed ge check\n"
    );
}

#[test]
fn object_fields_are_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let rules = write(
        &dir,
        "rules.yaml",
        "filters:\n  address: { operator: is_null }\n",
    );
    let records = write(&dir, "records.json", r#"[{"address": {"city": "Paris"}}]"#);

    let output = sieve(&["check", arg(&rules), arg(&records)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("field 'address'"));
}

#[test]
fn bad_rules_are_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", r#"{"filters": {"a": {"operator": "approx", "value": 1}}}"#);
    let records = write(&dir, "records.json", "[]");

    let output = sieve(&["check", arg(&rules), arg(&records)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown operator: approx"));
}
