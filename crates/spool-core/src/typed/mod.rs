//! Typed - payload codec と型付き Task API
//!
//! # 構成
//! - **PayloadCodec**: payload <-> JSON テキスト。全ストアで共有
//! - **Task**: Rust の型と job type を結びつける。呼び出し側は生の map ではなく値を扱う

pub mod codec;
pub mod task;

pub use self::codec::PayloadCodec;
pub use self::task::Task;
