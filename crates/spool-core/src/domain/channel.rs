//! Channel - ジョブ空間を名前で分割する単位

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::QueueError;

/// Channel used when the caller does not name one.
pub const DEFAULT_CHANNEL: &str = "default";

/// A channel name.
///
/// The flat-file store turns the name into a file name, so a name must be
/// non-empty, must not be `.` or `..`, and must not contain a path separator
/// or NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Channel(String);

impl Channel {
    pub fn new(name: impl Into<String>) -> Result<Self, QueueError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), QueueError> {
        if name.is_empty() {
            return Err(QueueError::Validation("channel name is empty".into()));
        }
        if name == "." || name == ".." {
            return Err(QueueError::Validation(format!(
                "channel name {name:?} is reserved"
            )));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(QueueError::Validation(format!(
                "channel name {name:?} contains a path separator or NUL"
            )));
        }
        Ok(())
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self(DEFAULT_CHANNEL.to_string())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Channel {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Channel {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_channel_is_named_default() {
        assert_eq!(Channel::default().as_str(), "default");
    }

    #[rstest]
    #[case::plain("emails")]
    #[case::dotted("billing.v2")]
    #[case::spaced("night jobs")]
    fn accepts_file_safe_names(#[case] name: &str) {
        assert_eq!(Channel::new(name).unwrap().as_str(), name);
    }

    #[rstest]
    #[case::empty("")]
    #[case::current_dir(".")]
    #[case::parent_dir("..")]
    #[case::slash("a/b")]
    #[case::backslash("a\\b")]
    #[case::nul("a\0b")]
    fn rejects_names_that_escape_the_folder(#[case] name: &str) {
        let err = Channel::new(name).unwrap_err();
        assert!(matches!(err, QueueError::Validation(_)));
    }

    #[test]
    fn deserialize_validates() {
        let ok: Channel = serde_json::from_str(r#""reports""#).unwrap();
        assert_eq!(ok.as_str(), "reports");
        assert!(serde_json::from_str::<Channel>(r#""../etc""#).is_err());
    }
}
