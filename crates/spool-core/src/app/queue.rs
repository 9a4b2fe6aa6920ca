//! Queue - 設定されたバックエンド上のチャンネル単位ファサード

use serde::Serialize;
use tracing::debug;

use crate::domain::{Channel, Job, JobType, Payload, QueueError, RetrievalMode};
use crate::ports::JobStore;
use crate::typed::{PayloadCodec, Task};

use super::backend::Backend;
use super::config::{BackendConfig, QueueConfig};

/// Queue は設定と、そこから構築したバックエンドを所有する
///
/// # キャッシュ
/// - バックエンドは初回利用時に構築し、設定が変わるまで保持する
/// - 別のバックエンドや retrieval mode を選ぶと破棄する
///
/// # 使用例
/// ```ignore
/// let mut queue = Queue::new();
/// queue.set_backend("file", json!({"folder": "/var/spool/app"}))?;
/// queue.add("mail.send", payload)?;
///
/// if queue.has()? {
///     let job = queue.get()?;
/// }
/// ```
#[derive(Debug, Default)]
pub struct Queue {
    config: QueueConfig,
    backend: Option<Backend>,
}

impl Queue {
    /// An unconfigured queue, oldest-first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;
        Ok(Self {
            config,
            backend: None,
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn mode(&self) -> RetrievalMode {
        self.config.mode
    }

    /// Select a backend by kind name with untyped parameters.
    ///
    /// On error the previous configuration stays in place.
    pub fn set_backend(&mut self, kind: &str, params: serde_json::Value) -> Result<(), QueueError> {
        let backend = BackendConfig::from_parts(kind, params)?;
        self.replace_backend(backend);
        Ok(())
    }

    pub fn set_backend_config(&mut self, backend: BackendConfig) -> Result<(), QueueError> {
        backend.validate()?;
        self.replace_backend(backend);
        Ok(())
    }

    pub fn set_retrieval_mode(&mut self, mode: &str) -> Result<(), QueueError> {
        let mode = mode.parse::<RetrievalMode>()?;
        self.set_mode(mode);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: RetrievalMode) {
        self.config.mode = mode;
        self.backend = None;
    }

    /// Back to unconfigured, oldest-first.
    pub fn clear(&mut self) {
        self.config = QueueConfig::default();
        self.backend = None;
    }

    pub fn add(
        &mut self,
        job_type: impl Into<JobType>,
        payload: Payload,
    ) -> Result<(), QueueError> {
        self.add_to(&Channel::default(), job_type, payload)
    }

    pub fn add_to(
        &mut self,
        channel: &Channel,
        job_type: impl Into<JobType>,
        payload: Payload,
    ) -> Result<(), QueueError> {
        let job_type = job_type.into();
        self.backend()?.add(&job_type, &payload, channel)
    }

    /// Enqueue any serializable value. Encoding happens before the backend is
    /// touched, so an unrepresentable value writes nothing.
    pub fn add_value<T: Serialize + ?Sized>(
        &mut self,
        channel: &Channel,
        job_type: impl Into<JobType>,
        value: &T,
    ) -> Result<(), QueueError> {
        let payload = PayloadCodec::to_payload(value)?;
        self.add_to(channel, job_type, payload)
    }

    pub fn push<T: Task>(&mut self, task: &T) -> Result<(), QueueError> {
        self.push_to(&Channel::default(), task)
    }

    pub fn push_to<T: Task>(&mut self, channel: &Channel, task: &T) -> Result<(), QueueError> {
        let payload = task.to_payload()?;
        self.add_to(channel, T::job_type(), payload)
    }

    pub fn get(&mut self) -> Result<Job, QueueError> {
        self.get_from(&Channel::default())
    }

    pub fn get_from(&mut self, channel: &Channel) -> Result<Job, QueueError> {
        self.backend()?.get(channel)
    }

    pub fn has(&mut self) -> Result<bool, QueueError> {
        self.has_in(&Channel::default())
    }

    pub fn has_in(&mut self, channel: &Channel) -> Result<bool, QueueError> {
        self.backend()?.has(channel)
    }

    /// The backend for the current configuration, built if needed.
    pub fn backend(&mut self) -> Result<&Backend, QueueError> {
        let backend = match self.backend.take() {
            Some(backend) => backend,
            None => {
                let config = self
                    .config
                    .backend
                    .as_ref()
                    .ok_or_else(|| QueueError::Configuration("unsupported driver".into()))?;
                let backend = Backend::open(config, self.config.mode)?;
                debug!(kind = %config.kind(), mode = %self.config.mode, "backend opened");
                backend
            }
        };
        Ok(self.backend.insert(backend))
    }

    fn replace_backend(&mut self, backend: BackendConfig) {
        self.config.backend = Some(backend);
        self.backend = None;
    }
}
