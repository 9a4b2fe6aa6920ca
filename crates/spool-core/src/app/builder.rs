//! QueueBuilder - Queue を組み立て、不正な設定は早期に失敗させる

use std::path::PathBuf;

use crate::domain::{QueueError, RetrievalMode};
use crate::impls::TableSpec;

use super::config::{BackendConfig, FileParams, QueueConfig, SqliteParams};
use super::queue::Queue;

/// QueueBuilder はバックエンドの選択と retrieval mode を集める
///
/// # 使用例
/// ```ignore
/// let queue = QueueBuilder::new()
///     .sqlite("/var/lib/app/queue.db", TableSpec::default())
///     .mode(RetrievalMode::NewestFirst)
///     .prepare_storage()
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時にバックエンドのパラメータを検証し、一度オープンする
/// - 存在しないフォルダや不正なテーブル名は初回利用時ではなくここで返る
#[derive(Debug, Default)]
pub struct QueueBuilder {
    backend: Option<BackendConfig>,
    mode: RetrievalMode,
    prepare: bool,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, folder: impl Into<PathBuf>) -> Self {
        self.backend = Some(BackendConfig::File(FileParams::new(folder)));
        self
    }

    pub fn sqlite(mut self, database: impl Into<PathBuf>, table: TableSpec) -> Self {
        self.backend = Some(BackendConfig::Sqlite(SqliteParams::new(database, table)));
        self
    }

    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn mode(mut self, mode: RetrievalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Create the backend's storage (the sqlite table) during `build()`.
    pub fn prepare_storage(mut self) -> Self {
        self.prepare = true;
        self
    }

    pub fn build(self) -> Result<Queue, QueueError> {
        let Some(backend) = self.backend else {
            return Err(QueueError::Configuration("unsupported driver".into()));
        };
        let mut queue = Queue::with_config(QueueConfig::new(backend, self.mode))?;
        let opened = queue.backend()?;
        if self.prepare {
            opened.prepare()?;
        }
        Ok(queue)
    }
}
