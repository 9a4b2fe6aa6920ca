//! Task trait - payload の型と job type を結びつける

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PayloadCodec;
use crate::domain::{Job, JobType, Payload, QueueError};

/// Task はシリアライズ可能な型と、その保存先の job type を結びつける
///
/// # 使用例
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct SendMail {
///     to: String,
/// }
///
/// impl Task for SendMail {
///     const TYPE: &'static str = "mail.send.v1";
/// }
/// ```
///
/// 型は JSON object にシリアライズされること。
pub trait Task: Serialize + DeserializeOwned {
    const TYPE: &'static str;

    fn job_type() -> JobType {
        JobType::new(Self::TYPE)
    }

    fn to_payload(&self) -> Result<Payload, QueueError> {
        PayloadCodec::to_payload(self)
    }

    /// Decode a job taken from a queue, checking its type tag first.
    fn from_job(job: &Job) -> Result<Self, QueueError> {
        if job.job_type().as_str() != Self::TYPE {
            return Err(QueueError::Decoding(format!(
                "expected job type {}, found {}",
                Self::TYPE,
                job.job_type()
            )));
        }
        job.decode()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TestTask {
        pub value: i32,
    }

    impl Task for TestTask {
        const TYPE: &'static str = "test.task.create.v1";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AnotherTestTask {
        pub name: String,
        pub family: HashMap<String, String>,
    }

    impl Task for AnotherTestTask {
        const TYPE: &'static str = "test.task.another.v1";
    }

    #[test]
    fn task_round_trips_through_job() {
        let task = TestTask { value: 7 };
        let job = Job::new(TestTask::job_type(), task.to_payload().unwrap());
        assert_eq!(job.job_type().as_str(), TestTask::TYPE);
        assert_eq!(TestTask::from_job(&job).unwrap(), task);
    }

    #[test]
    fn from_job_rejects_other_type() {
        let task = TestTask { value: 1 };
        let job = Job::new(TestTask::job_type(), task.to_payload().unwrap());
        let err = AnotherTestTask::from_job(&job).unwrap_err();
        assert!(matches!(err, QueueError::Decoding(ref msg) if msg.contains(TestTask::TYPE)));
    }
}
