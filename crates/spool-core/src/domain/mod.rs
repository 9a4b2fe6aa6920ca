//! Domain - ドメインモデル（job, channel, retrieval mode, errors）

pub mod channel;
pub mod errors;
pub mod job;
pub mod mode;

pub use self::channel::{Channel, DEFAULT_CHANNEL};
pub use self::errors::{ErrorKind, QueueError};
pub use self::job::{Job, JobType, Payload};
pub use self::mode::RetrievalMode;
