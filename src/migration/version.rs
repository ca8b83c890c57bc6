use crate::constants::{DEFAULT_BASELINE_VERSION, SCHEMA_CREATION_VERSION};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Migration version must not be empty")]
    Empty,

    #[error(
        "Invalid version containing non-numeric characters. Only 0..9 and . are allowed. Invalid version: {version}"
    )]
    NonNumeric { version: String },
}

/// A dotted numeric migration version such as `1`, `1.2` or `2024_01_15`.
///
/// Parts are compared numerically with no upper bound, and trailing zero
/// parts are not significant: `1.0` and `1` are the same version. The text the
/// version was parsed from (with `_` normalised to `.`) is kept for display.
#[derive(Debug, Clone)]
pub struct MigrationVersion {
    /// Digit strings without leading zeros, trailing zero parts removed
    parts: Vec<String>,
    display: String,
}

impl MigrationVersion {
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let normalized = version.trim().replace('_', ".");
        if normalized.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = Vec::new();
        for part in normalized.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::NonNumeric {
                    version: normalized.clone(),
                });
            }
            let trimmed = part.trim_start_matches('0');
            parts.push(if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            });
        }

        while parts.len() > 1 && parts.last().is_some_and(|p| p == "0") {
            parts.pop();
        }

        Ok(Self {
            parts,
            display: normalized,
        })
    }

    /// The version implicitly held by a schema created before any baseline
    pub fn schema_creation() -> Self {
        Self {
            parts: vec![SCHEMA_CREATION_VERSION.to_string()],
            display: SCHEMA_CREATION_VERSION.to_string(),
        }
    }

    pub fn default_baseline() -> Self {
        Self {
            parts: vec![DEFAULT_BASELINE_VERSION.to_string()],
            display: DEFAULT_BASELINE_VERSION.to_string(),
        }
    }

    pub fn is_schema_creation(&self) -> bool {
        *self == Self::schema_creation()
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }
}

fn compare_part(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let longest = self.parts.len().max(other.parts.len());
        for i in 0..longest {
            let a = self.parts.get(i).map(String::as_str).unwrap_or("0");
            let b = other.parts.get(i).map(String::as_str).unwrap_or("0");
            match compare_part(a, b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MigrationVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for MigrationVersion {}

impl Hash for MigrationVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl FromStr for MigrationVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MigrationVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

impl<'de> Deserialize<'de> for MigrationVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
