//! Job - 値オブジェクト（type tag + payload）

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::QueueError;

/// Job payload: a JSON object. Key order is kept as inserted.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// User-defined classification tag. Opaque to the stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobType(String);

impl JobType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for JobType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A (type, payload) pair persisted for one-time retrieval.
///
/// Built by a store when a record is taken out of a channel; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "type")]
    job_type: JobType,
    payload: Payload,
}

impl Job {
    pub fn new(job_type: impl Into<JobType>, payload: Payload) -> Self {
        Self {
            job_type: job_type.into(),
            payload,
        }
    }

    pub fn job_type(&self) -> &JobType {
        &self.job_type
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_parts(self) -> (JobType, Payload) {
        (self.job_type, self.payload)
    }

    /// Deserialize the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        serde_json::from_value(serde_json::Value::Object(self.payload.clone()))
            .map_err(|e| QueueError::Decoding(format!("payload of job {}: {e}", self.job_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Greeting {
        name: String,
        times: u32,
    }

    fn payload(value: serde_json::Value) -> Payload {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn accessors_expose_parts() {
        let job = Job::new("mail.send", payload(json!({"to": "a@b.c"})));
        assert_eq!(job.job_type().as_str(), "mail.send");
        assert_eq!(job.payload()["to"], "a@b.c");

        let (job_type, body) = job.into_parts();
        assert_eq!(job_type, JobType::new("mail.send"));
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn decode_into_typed_value() {
        let job = Job::new("greet", payload(json!({"name": "spool", "times": 2})));
        let greeting: Greeting = job.decode().unwrap();
        assert_eq!(
            greeting,
            Greeting {
                name: "spool".to_string(),
                times: 2
            }
        );
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let job = Job::new("greet", payload(json!({"name": 42})));
        let err = job.decode::<Greeting>().unwrap_err();
        assert!(matches!(err, QueueError::Decoding(_)));
        assert!(err.to_string().contains("greet"));
    }

    #[test]
    fn serializes_with_type_key() {
        let job = Job::new("noop", Payload::new());
        let text = serde_json::to_string(&job).unwrap();
        assert_eq!(text, r#"{"type":"noop","payload":{}}"#);
    }
}
