//! spool-core
//!
//! Deferred-job persistence. A job (type tag + JSON object payload) is
//! appended to a named channel and later taken out exactly once, either
//! oldest-first or newest-first.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Job, Channel, RetrievalMode, errors）
//! - **typed**: 型付き API（PayloadCodec, Task trait）
//! - **ports**: 抽象化レイヤー（JobStore）
//! - **impls**: 実装（FileStore: チャンネルごとのレコードファイル、SqliteStore）
//! - **app**: 設定、Backend、Queue ファサード

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

pub use app::{
    Backend, BackendConfig, BackendKind, FileParams, Queue, QueueBuilder, QueueConfig,
    SqliteParams,
};
pub use domain::{
    Channel, DEFAULT_CHANNEL, ErrorKind, Job, JobType, Payload, QueueError, RetrievalMode,
};
pub use impls::{ColumnNames, FileStore, SqliteStore, TableSpec};
pub use ports::JobStore;
pub use typed::{PayloadCodec, Task};
