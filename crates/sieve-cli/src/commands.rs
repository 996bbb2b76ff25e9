use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use indexmap::IndexMap;
use sieve::{evaluate_with_messages, Criteria, SqlCompiler, Value};
use std::io::Write;
use std::path::Path;

use crate::config::Config;

/// Output format for compiled parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParamFormat {
    Json,
    Yaml,
}

/// A record read from the input, with fields in document order.
pub type JsonRecord = IndexMap<String, Value>;

/// Prints the SQL text, then its parameters.
pub fn run_sql(
    criteria: &Criteria,
    config: &Config,
    format: ParamFormat,
    out: &mut impl Write,
) -> Result<()> {
    let query = SqlCompiler::new(config.table()?)
        .columns(config.columns.iter().map(String::as_str))
        .column_mapping(
            config
                .column_mapping
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
        .compile(criteria)
        .context("Failed to compile rules")?;

    writeln!(out, "{}", query.sql)?;
    match format {
        ParamFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&query.parameters)?)?;
        }
        ParamFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&query.parameters)?)?,
    }
    Ok(())
}

/// Checks every record and prints one line per record.
///
/// Returns `true` when every record passed.
pub fn run_check(
    criteria: &Criteria,
    records: &[JsonRecord],
    out: &mut impl Write,
) -> Result<bool> {
    let mut all_passed = true;
    for (index, record) in records.iter().enumerate() {
        let outcome = evaluate_with_messages(record, criteria)
            .with_context(|| format!("Failed to evaluate record {index}"))?;
        if outcome.passed {
            writeln!(out, "{index}: ok")?;
        } else {
            all_passed = false;
            writeln!(out, "{index}: FAIL: {}", outcome.errors.join("; "))?;
        }
    }
    tracing::info!(records = records.len(), all_passed, "checked records");
    Ok(all_passed)
}

/// Reads records from a JSON array of objects or from JSON lines.
pub fn read_records(path: &Path) -> Result<Vec<JsonRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    parse_records(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))
}

pub fn parse_records(content: &str) -> Result<Vec<JsonRecord>> {
    let mut records = Vec::new();
    let documents = serde_json::Deserializer::from_str(content).into_iter::<serde_json::Value>();
    for document in documents {
        match document? {
            serde_json::Value::Array(items) => {
                for item in items {
                    records.push(into_record(item, records.len())?);
                }
            }
            other => records.push(into_record(other, records.len())?),
        }
    }
    Ok(records)
}

fn into_record(value: serde_json::Value, index: usize) -> Result<JsonRecord> {
    match value {
        serde_json::Value::Object(fields) => fields
            .into_iter()
            .map(|(name, value)| {
                let value = Value::try_from(value)
                    .with_context(|| format!("Record {index}: field '{name}'"))?;
                Ok::<_, anyhow::Error>((name, value))
            })
            .collect(),
        other => bail!("Record {index} is not a JSON object: {other}"),
    }
}
