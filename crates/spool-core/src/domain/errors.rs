//! Errors - エラー型と分類

use thiserror::Error;

use super::Channel;

/// ErrorKind は [`QueueError`] を呼び出し側向けに分類
///
/// # 分類
/// - Configuration / Validation: 呼び出し側の誤用。即座に返す
/// - NotFound: 想定内。チャンネルに渡せるジョブがなかった
/// - Encoding / Decoding: payload が表現できない、または保存済みデータの破損
/// - Io: ファイルシステム / データベースの失敗
///
/// どの種別もリトライしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    NotFound,
    Encoding,
    Decoding,
    Io,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("{0}")]
    Configuration(String),

    #[error("invalid parameters: {0}")]
    Validation(String),

    #[error("no job found in channel {channel}")]
    NotFound { channel: Channel },

    #[error("cannot encode payload: {0}")]
    Encoding(String),

    #[error("cannot decode job: {0}")]
    Decoding(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::Configuration(_) => ErrorKind::Configuration,
            QueueError::Validation(_) => ErrorKind::Validation,
            QueueError::NotFound { .. } => ErrorKind::NotFound,
            QueueError::Encoding(_) => ErrorKind::Encoding,
            QueueError::Decoding(_) => ErrorKind::Decoding,
            QueueError::Io(_) | QueueError::Database(_) => ErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn not_found(channel: &Channel) -> Self {
        QueueError::NotFound {
            channel: channel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::configuration(QueueError::Configuration("x".into()), ErrorKind::Configuration)]
    #[case::validation(QueueError::Validation("x".into()), ErrorKind::Validation)]
    #[case::encoding(QueueError::Encoding("x".into()), ErrorKind::Encoding)]
    #[case::decoding(QueueError::Decoding("x".into()), ErrorKind::Decoding)]
    #[case::io(QueueError::Io(std::io::Error::other("disk full")), ErrorKind::Io)]
    #[case::database(
        QueueError::Database(rusqlite::Error::QueryReturnedNoRows),
        ErrorKind::Io
    )]
    fn kind_matches_variant(#[case] err: QueueError, #[case] expected: ErrorKind) {
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn not_found_names_channel() {
        let err = QueueError::not_found(&Channel::new("mail").unwrap());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no job found in channel mail");
    }
}
