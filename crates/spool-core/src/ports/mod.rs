//! Ports - ストレージの抽象化レイヤー
//!
//! どのバックエンドもチャンネルに対して同じ 3 操作を公開する。
//! 実装は [`crate::impls`]、ファサードは [`crate::app::Backend`] 越しに保持する。

pub mod job_store;

pub use self::job_store::JobStore;
