//! RetrievalMode - `get` がチャンネルのどちら端から取り出すか

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::QueueError;

/// Read-time ordering policy. Arrival order is the only thing stored;
/// the mode decides which end of it `get` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetrievalMode {
    #[default]
    #[serde(alias = "fifo")]
    OldestFirst,

    #[serde(alias = "filo")]
    NewestFirst,
}

impl RetrievalMode {
    pub const SUPPORTED: [&'static str; 2] = ["oldest-first", "newest-first"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::OldestFirst => "oldest-first",
            RetrievalMode::NewestFirst => "newest-first",
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalMode {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oldest-first" | "fifo" => Ok(RetrievalMode::OldestFirst),
            "newest-first" | "filo" => Ok(RetrievalMode::NewestFirst),
            other => Err(QueueError::Configuration(format!(
                "unsupported retrieval mode {other:?} (expected one of {:?})",
                Self::SUPPORTED
            ))),
        }
    }
}
