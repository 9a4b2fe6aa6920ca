//! Backend - 設定で選ばれたストアを 1 つのハンドルとして保持

use crate::domain::{Channel, Job, JobType, Payload, QueueError, RetrievalMode};
use crate::impls::{FileStore, SqliteStore};
use crate::ports::JobStore;

use super::config::BackendConfig;

/// Closed set of stores. Chosen once from a [`BackendConfig`].
#[derive(Debug, Clone)]
pub enum Backend {
    File(FileStore),
    Sqlite(SqliteStore),
}

impl Backend {
    /// Validate `config` and build the matching store.
    pub fn open(config: &BackendConfig, mode: RetrievalMode) -> Result<Self, QueueError> {
        config.validate()?;
        let backend = match config {
            BackendConfig::File(params) => Backend::File(FileStore::new(&params.folder, mode)),
            BackendConfig::Sqlite(params) => Backend::Sqlite(SqliteStore::new(
                &params.database,
                params.table.clone(),
                mode,
            )?),
        };
        Ok(backend)
    }

    pub fn mode(&self) -> RetrievalMode {
        match self {
            Backend::File(store) => store.mode(),
            Backend::Sqlite(store) => store.mode(),
        }
    }

    /// Create whatever storage the backend expects to exist.
    ///
    /// The sqlite table is created if missing; the file backend needs nothing.
    pub fn prepare(&self) -> Result<(), QueueError> {
        match self {
            Backend::File(_) => Ok(()),
            Backend::Sqlite(store) => store.ensure_table(),
        }
    }

    fn store(&self) -> &dyn JobStore {
        match self {
            Backend::File(store) => store,
            Backend::Sqlite(store) => store,
        }
    }
}

impl JobStore for Backend {
    fn add(
        &self,
        job_type: &JobType,
        payload: &Payload,
        channel: &Channel,
    ) -> Result<(), QueueError> {
        self.store().add(job_type, payload, channel)
    }

    fn get(&self, channel: &Channel) -> Result<Job, QueueError> {
        self.store().get(channel)
    }

    fn has(&self, channel: &Channel) -> Result<bool, QueueError> {
        self.store().has(channel)
    }
}
