//! PayloadCodec - payload と保存用テキストの相互変換

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Payload, QueueError};

/// PayloadCodec は [`Payload`] を JSON テキストに変換し、また元に戻す
///
/// # 不変条件
/// - すべての payload で `decode(encode(p)) == p`
/// - payload は JSON object のみ。それ以外はどちらの方向でも拒否
pub struct PayloadCodec;

impl PayloadCodec {
    pub fn encode(payload: &Payload) -> Result<String, QueueError> {
        serde_json::to_string(payload).map_err(|e| QueueError::Encoding(e.to_string()))
    }

    pub fn decode(text: &str) -> Result<Payload, QueueError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| QueueError::Decoding(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(QueueError::Decoding(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Convert any serializable value into a payload.
    ///
    /// Fails with [`QueueError::Encoding`] when the value has no JSON form
    /// (the serializer errors) or does not serialize to an object.
    pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Payload, QueueError> {
        match serde_json::to_value(value).map_err(|e| QueueError::Encoding(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(QueueError::Encoding(format!(
                "payload must serialize to a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    /// Stands in for a value such as an open handle that has no JSON form.
    struct OpenHandle;

    impl Serialize for OpenHandle {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("an open handle cannot be serialized"))
        }
    }

    #[test]
    fn nested_payload_round_trips() {
        let original = payload(json!({
            "user": {"id": 7, "tags": ["a", "b", {"deep": [1, 2.5, null]}]},
            "flag": true,
            "note": "line one\nline two, with \"quotes\""
        }));
        let text = PayloadCodec::encode(&original).unwrap();
        assert_eq!(PayloadCodec::decode(&text).unwrap(), original);
    }

    #[test]
    fn key_order_is_preserved() {
        let original = payload(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let text = PayloadCodec::encode(&original).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2,"mid":3}"#);
        let keys: Vec<_> = PayloadCodec::decode(&text).unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_payload_encodes_as_empty_object() {
        assert_eq!(PayloadCodec::encode(&Payload::new()).unwrap(), "{}");
    }

    #[test]
    fn decode_rejects_malformed_text() {
        let err = PayloadCodec::decode("{\"unterminated\": ").unwrap_err();
        assert!(matches!(err, QueueError::Decoding(_)));
    }

    #[test]
    fn decode_rejects_non_object() {
        let err = PayloadCodec::decode("[1,2,3]").unwrap_err();
        assert!(matches!(err, QueueError::Decoding(ref msg) if msg.contains("an array")));
    }

    #[test]
    fn to_payload_rejects_unserializable_value() {
        let mut map = BTreeMap::new();
        map.insert("handle", OpenHandle);
        let err = PayloadCodec::to_payload(&map).unwrap_err();
        assert!(matches!(err, QueueError::Encoding(ref msg) if msg.contains("open handle")));
    }

    #[test]
    fn to_payload_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = PayloadCodec::to_payload(&map).unwrap_err();
        assert!(matches!(err, QueueError::Encoding(_)));
    }

    #[test]
    fn to_payload_rejects_scalars() {
        let err = PayloadCodec::to_payload(&42).unwrap_err();
        assert!(matches!(err, QueueError::Encoding(ref msg) if msg.contains("a number")));
    }
}
