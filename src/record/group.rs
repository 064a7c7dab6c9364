use super::RecordError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Group of configurable categories.
pub const CATEGORY: &str = "category";
/// Group of configurable document types.
pub const DOCUMENT_TYPE: &str = "document_type";
/// Group of team contacts.
pub const CONTACTS: &str = "contacts";
/// Group of published articles on legal norms.
pub const ARTICLES: &str = "articles";
/// Group of special (feature) articles.
pub const SPECIAL_ARTICLES: &str = "special_articles";
/// Group of visitor consultations, kept in order of arrival.
pub const CONSULTATIONS: &str = "consultations";

#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static GROUP_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]{0,63}$").expect("GROUP_KEY_REGEX is a valid regex literal")
});

/// An independent ordering namespace. Ordinals in different groups never
/// interact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupKey(String);

impl GroupKey {
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        if GROUP_KEY_REGEX.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(RecordError::InvalidGroup(raw.to_string()))
        }
    }

    #[must_use]
    pub fn category() -> Self {
        Self(CATEGORY.to_string())
    }

    #[must_use]
    pub fn document_type() -> Self {
        Self(DOCUMENT_TYPE.to_string())
    }

    #[must_use]
    pub fn contacts() -> Self {
        Self(CONTACTS.to_string())
    }

    #[must_use]
    pub fn articles() -> Self {
        Self(ARTICLES.to_string())
    }

    #[must_use]
    pub fn special_articles() -> Self {
        Self(SPECIAL_ARTICLES.to_string())
    }

    #[must_use]
    pub fn consultations() -> Self {
        Self(CONSULTATIONS.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupKey {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GroupKey> for String {
    fn from(value: GroupKey) -> Self {
        value.0
    }
}

impl FromStr for GroupKey {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
