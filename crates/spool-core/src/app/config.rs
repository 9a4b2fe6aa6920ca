//! Config - バックエンドの選択とそのパラメータ
//!
//! # 形式
//! ```toml
//! mode = "newest-first"
//!
//! [backend]
//! kind = "sqlite"
//! database = "/var/lib/app/queue.db"
//! table = { name = "jobs", columns = { id = "id", type = "type", payload = "payload", channel = "channel" } }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{QueueError, RetrievalMode};
use crate::impls::TableSpec;

/// Supported backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    File,
    #[serde(alias = "relational")]
    Sqlite,
}

impl BackendKind {
    pub const SUPPORTED: [&'static str; 2] = ["file", "sqlite"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(BackendKind::File),
            "sqlite" | "relational" => Ok(BackendKind::Sqlite),
            other => Err(QueueError::Configuration(format!(
                "unsupported driver {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParams {
    pub folder: PathBuf,
}

impl FileParams {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        if self.folder.is_dir() {
            Ok(())
        } else {
            Err(QueueError::Validation(format!(
                "folder {} is not an existing directory",
                self.folder.display()
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteParams {
    pub database: PathBuf,
    pub table: TableSpec,
}

impl SqliteParams {
    pub fn new(database: impl Into<PathBuf>, table: TableSpec) -> Self {
        Self {
            database: database.into(),
            table,
        }
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        if self.database.as_os_str().is_empty() {
            return Err(QueueError::Validation("database path is empty".into()));
        }
        self.table.validate()
    }
}

/// A backend kind together with the parameters it is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    File(FileParams),
    #[serde(alias = "relational")]
    Sqlite(SqliteParams),
}

impl BackendConfig {
    /// Build from an untyped kind name and parameter object.
    ///
    /// Unknown kinds are a configuration error; parameters that do not fit
    /// the kind's shape or fail [`validate`](Self::validate) are a validation
    /// error.
    pub fn from_parts(kind: &str, params: serde_json::Value) -> Result<Self, QueueError> {
        let config = match kind.parse::<BackendKind>()? {
            BackendKind::File => BackendConfig::File(
                serde_json::from_value(params)
                    .map_err(|e| QueueError::Validation(format!("file parameters: {e}")))?,
            ),
            BackendKind::Sqlite => BackendConfig::Sqlite(
                serde_json::from_value(params)
                    .map_err(|e| QueueError::Validation(format!("sqlite parameters: {e}")))?,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::File(_) => BackendKind::File,
            BackendConfig::Sqlite(_) => BackendKind::Sqlite,
        }
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        match self {
            BackendConfig::File(params) => params.validate(),
            BackendConfig::Sqlite(params) => params.validate(),
        }
    }
}

/// Everything a [`Queue`](super::Queue) needs: which backend, and which end
/// of a channel `get` takes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub mode: RetrievalMode,
}

impl QueueConfig {
    pub fn new(backend: BackendConfig, mode: RetrievalMode) -> Self {
        Self {
            backend: Some(backend),
            mode,
        }
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        match &self.backend {
            Some(backend) => backend.validate(),
            None => Ok(()),
        }
    }
}
