//! Config file loading for the `spool` binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use spool_core::{BackendConfig, QueueConfig, RetrievalMode};

/// On-disk shape: the queue configuration plus CLI-only switches.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub mode: RetrievalMode,
    pub backend: Option<BackendConfig>,
    /// Create the sqlite table before every command.
    #[serde(default)]
    pub create_table: bool,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            backend: self.backend.clone(),
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spool_core::{BackendKind, ColumnNames};

    #[test]
    fn parses_file_backend() {
        let config = CliConfig::parse(
            r#"
            mode = "filo"

            [backend]
            kind = "file"
            folder = "/var/spool/app"
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, RetrievalMode::NewestFirst);
        assert_eq!(config.backend.unwrap().kind(), BackendKind::File);
        assert!(!config.create_table);
    }

    #[test]
    fn parses_sqlite_backend_with_custom_columns() {
        let config = CliConfig::parse(
            r#"
            create_table = true

            [backend]
            kind = "relational"
            database = "queue.db"

            [backend.table]
            name = "deferred"
            columns = { id = "seq", type = "kind", payload = "body", channel = "lane" }
            "#,
        )
        .unwrap();
        assert!(config.create_table);
        assert_eq!(config.mode, RetrievalMode::OldestFirst);
        let Some(BackendConfig::Sqlite(params)) = config.backend else {
            panic!("expected sqlite backend");
        };
        assert_eq!(params.table.name, "deferred");
        assert_ne!(params.table.columns, ColumnNames::default());
        assert_eq!(params.table.columns.job_type, "kind");
    }

    #[test]
    fn empty_file_is_unconfigured() {
        let config = CliConfig::parse("").unwrap();
        assert!(config.backend.is_none());
        assert_eq!(config.queue_config(), QueueConfig::default());
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = CliConfig::parse("[backend]\nkind = \"redis\"\n").unwrap_err();
        assert!(err.to_string().contains("redis"), "got {err}");
    }
}
