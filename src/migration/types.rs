use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_SCRIPT_LENGTH};
use crate::migration::version::MigrationVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of row stored in the tracking table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationType {
    /// Bookkeeping row recording that the tool created the schema itself
    Schema,
    /// The baseline marker
    Baseline,
    /// A versioned SQL script
    Sql,
}

impl MigrationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "SCHEMA",
            Self::Baseline => "BASELINE",
            Self::Sql => "SQL",
        }
    }

    /// Rows of this type are migration history rather than bookkeeping
    pub fn is_history(&self) -> bool {
        matches!(self, Self::Sql)
    }
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "SCHEMA" => Ok(Self::Schema),
            "BASELINE" => Ok(Self::Baseline),
            "SQL" => Ok(Self::Sql),
            _ => Err(anyhow::anyhow!("Unknown migration type: {}", s)),
        }
    }
}

/// The persisted record of a baseline decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineMarker {
    pub version: MigrationVersion,
    pub description: String,
}

impl BaselineMarker {
    pub fn new(version: MigrationVersion, description: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
        }
    }

    pub fn matches(&self, version: &MigrationVersion, description: &str) -> bool {
        self.version == *version && self.description == description
    }
}

impl fmt::Display for BaselineMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.version, self.description)
    }
}

/// A row of the tracking table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub installed_rank: i32,
    pub version: Option<MigrationVersion>,
    pub description: String,
    pub migration_type: MigrationType,
    pub script: String,
    pub checksum: Option<String>,
    pub installed_by: Option<String>,
    pub installed_on: Option<DateTime<Utc>>,
    pub execution_time_ms: i32,
    pub success: bool,
}

impl AppliedMigration {
    /// Build a row that has not been persisted yet, abbreviating the free-text
    /// columns to what the tracking table accepts
    pub fn new(
        version: Option<MigrationVersion>,
        description: &str,
        migration_type: MigrationType,
        script: &str,
        checksum: Option<String>,
        execution_time_ms: i32,
        success: bool,
    ) -> Self {
        Self {
            installed_rank: 0,
            version,
            description: abbreviate_description(description),
            migration_type,
            script: abbreviate_script(script),
            checksum,
            installed_by: None,
            installed_on: None,
            execution_time_ms,
            success,
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.migration_type == MigrationType::Baseline
    }

    /// Convert a baseline row back into a marker; `None` for any other row
    pub fn as_baseline_marker(&self) -> Option<BaselineMarker> {
        match (&self.migration_type, &self.version) {
            (MigrationType::Baseline, Some(version)) => {
                Some(BaselineMarker::new(version.clone(), self.description.clone()))
            }
            _ => None,
        }
    }
}

/// A migration script discovered by a resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMigration {
    pub version: MigrationVersion,
    pub description: String,
    pub script: String,
    pub checksum: String,
    pub migration_type: MigrationType,
    pub physical_location: PathBuf,
}

pub fn abbreviate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LENGTH {
        return description.to_string();
    }

    let kept: String = description.chars().take(MAX_DESCRIPTION_LENGTH - 3).collect();
    format!("{}...", kept)
}

pub fn abbreviate_script(script: &str) -> String {
    if script.chars().count() <= MAX_SCRIPT_LENGTH {
        return script.to_string();
    }

    let kept: String = script
        .chars()
        .skip(3)
        .take(MAX_SCRIPT_LENGTH - 3)
        .collect();
    format!("...{}", kept)
}
