//! Owner tag attached to every dashboard row.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Family member a row belongs to (`gyubaek`, `mom`, `dad`, ...).
///
/// Stored trimmed; blank tags are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerTag(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerTagError {
    Blank,
}

impl Display for OwnerTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "owner tag must not be blank"),
        }
    }
}

impl Error for OwnerTagError {}

impl OwnerTag {
    pub fn new(value: impl Into<String>) -> Result<Self, OwnerTagError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(OwnerTagError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OwnerTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerTag {
    type Error = OwnerTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerTag> for String {
    fn from(value: OwnerTag) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::{OwnerTag, OwnerTagError};

    #[test]
    fn owner_tag_is_trimmed() {
        let tag = OwnerTag::new("  mom ").unwrap();
        assert_eq!(tag.as_str(), "mom");
    }

    #[test]
    fn blank_owner_tag_is_rejected() {
        assert_eq!(OwnerTag::new(" \t").unwrap_err(), OwnerTagError::Blank);
    }

    #[test]
    fn owner_tag_deserialization_validates() {
        let err = serde_json::from_str::<OwnerTag>("\"  \"");
        assert!(err.is_err());
        let tag: OwnerTag = serde_json::from_str("\"dad\"").unwrap();
        assert_eq!(tag.as_str(), "dad");
    }
}
