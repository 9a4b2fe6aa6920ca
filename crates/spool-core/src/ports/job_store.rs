//! JobStore port - チャンネルごとにジョブを追加・確認・取り出す

use crate::domain::{Channel, Job, JobType, Payload, QueueError};

/// JobStore はチャンネルごとにジョブを永続化し、各ジョブを一度だけ渡す
///
/// # 契約
/// - `add` はレコードを 1 件追加する。既存のレコードには触れない
/// - `has` は `get` が何かを見つけるかを返す
/// - `get` は retrieval mode に従って 1 件選び、同じ呼び出しの中で削除する。
///   なければ [`QueueError::NotFound`]
///
/// 呼び出しはブロッキング。ファイルハンドルや接続は呼び出しの中で取得し、
/// 戻る前に解放する。同じチャンネルへの同時アクセスは保護しない。
pub trait JobStore {
    fn add(
        &self,
        job_type: &JobType,
        payload: &Payload,
        channel: &Channel,
    ) -> Result<(), QueueError>;

    fn get(&self, channel: &Channel) -> Result<Job, QueueError>;

    fn has(&self, channel: &Channel) -> Result<bool, QueueError>;
}
