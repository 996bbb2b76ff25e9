use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Optional YAML configuration for the `sql` subcommand.
///
/// ```yaml
/// table: users
/// columns: [id, name, email]
/// column_mapping:
///   full_name: name
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub table: Option<String>,
    pub columns: Vec<String>,
    pub column_mapping: IndexMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads the file when given, otherwise returns the empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command line overrides. Flags win over the file; mapping
    /// entries from flags replace entries with the same logical field.
    pub fn with_overrides(
        mut self,
        table: Option<String>,
        columns: Vec<String>,
        mapping: Vec<(String, String)>,
    ) -> Self {
        if table.is_some() {
            self.table = table;
        }
        if !columns.is_empty() {
            self.columns = columns;
        }
        self.column_mapping.extend(mapping);
        self
    }

    pub fn table(&self) -> Result<&str> {
        match self.table.as_deref() {
            Some(table) if !table.trim().is_empty() => Ok(table),
            _ => bail!("No table given: pass --table or set `table` in the config file"),
        }
    }
}

/// Parses a `logical=physical` column mapping flag.
pub fn parse_mapping(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((logical, physical)) if !logical.is_empty() && !physical.is_empty() => {
            Ok((logical.to_string(), physical.to_string()))
        }
        _ => Err(format!("expected logical=physical, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "table: users\ncolumns: [id, name]\ncolumn_mapping:\n  full_name: name"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.table.as_deref(), Some("users"));
        assert_eq!(config.columns, ["id", "name"]);
        assert_eq!(config.column_mapping["full_name"], "name");
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "table: users").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.columns.is_empty());
        assert!(config.column_mapping.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tabel: users").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/sieve.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config {
            table: Some("users".into()),
            columns: vec!["*".into()],
            column_mapping: IndexMap::from([
                ("a".to_string(), "col_a".to_string()),
                ("b".to_string(), "col_b".to_string()),
            ]),
        }
        .with_overrides(
            Some("people".into()),
            vec!["id".into()],
            vec![("a".into(), "alpha".into())],
        );

        assert_eq!(config.table().unwrap(), "people");
        assert_eq!(config.columns, ["id"]);
        assert_eq!(config.column_mapping["a"], "alpha");
        assert_eq!(config.column_mapping["b"], "col_b");
    }

    #[test]
    fn test_table_is_required() {
        assert!(Config::default().table().is_err());
        let blank = Config::default().with_overrides(Some(" ".into()), vec![], vec![]);
        assert!(blank.table().is_err());
    }

    #[test]
    fn test_parse_mapping() {
        assert_eq!(
            parse_mapping("full_name=name").unwrap(),
            ("full_name".to_string(), "name".to_string())
        );
        assert_eq!(
            parse_mapping("a=\"b c\"").unwrap(),
            ("a".to_string(), "\"b c\"".to_string())
        );
        assert!(parse_mapping("nope").is_err());
        assert!(parse_mapping("=x").is_err());
    }
}
