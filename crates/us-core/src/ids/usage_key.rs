use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque reference to a piece of authored content (the key sent to the
/// staging endpoint when the user copies an item).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageKey(String);

impl UsageKey {
    pub fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// A usage key is never empty; the backend rejects blank references.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl Display for UsageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UsageKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UsageKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
