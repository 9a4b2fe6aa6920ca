//! App - 設定と Queue ファサード
//!
//! # コンポーネント
//! - **QueueConfig / BackendConfig**: ストアの選択、パラメータ、retrieval mode
//! - **Backend**: `BackendConfig` から構築したストア
//! - **Queue**: バックエンド上のチャンネル単位の add / get / has
//! - **QueueBuilder**: `Queue` を構築し、事前に検証する

pub mod backend;
pub mod builder;
pub mod config;
pub mod queue;

pub use self::backend::Backend;
pub use self::builder::QueueBuilder;
pub use self::config::{BackendConfig, BackendKind, FileParams, QueueConfig, SqliteParams};
pub use self::queue::Queue;
