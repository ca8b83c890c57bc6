use crate::migration::types::{AppliedMigration, MigrationType, ResolvedMigration};
use crate::migration::version::MigrationVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where a migration stands relative to the tracking table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Pending,
    BelowBaseline,
    Baseline,
    Success,
    Failed,
    Missing,
    Future,
}

impl MigrationState {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::BelowBaseline => "<Baseln",
            Self::Baseline => "Baselin",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Missing => "Missing",
            Self::Future => "Future",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            Self::Baseline | Self::Success | Self::Failed | Self::Missing | Self::Future
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationInfo {
    pub version: Option<MigrationVersion>,
    pub description: String,
    pub migration_type: MigrationType,
    pub state: MigrationState,
    pub installed_on: Option<DateTime<Utc>>,
}

/// Merge the resolved scripts with the tracking table rows into one ordered view.
///
/// Schema-creation rows are bookkeeping and are left out.
pub fn migration_infos(
    resolved: &[ResolvedMigration],
    applied: &[AppliedMigration],
) -> Vec<MigrationInfo> {
    let baseline = applied.iter().find_map(|a| a.as_baseline_marker());
    let latest_resolved = resolved.iter().map(|r| &r.version).max();

    let mut by_version: BTreeMap<MigrationVersion, MigrationInfo> = BTreeMap::new();

    for migration in resolved {
        let state = match &baseline {
            Some(marker) if migration.version <= marker.version => MigrationState::BelowBaseline,
            _ => MigrationState::Pending,
        };
        by_version.insert(
            migration.version.clone(),
            MigrationInfo {
                version: Some(migration.version.clone()),
                description: migration.description.clone(),
                migration_type: migration.migration_type,
                state,
                installed_on: None,
            },
        );
    }

    for row in applied {
        let Some(version) = &row.version else {
            continue;
        };

        let state = match row.migration_type {
            MigrationType::Schema => continue,
            MigrationType::Baseline => MigrationState::Baseline,
            MigrationType::Sql if !row.success => MigrationState::Failed,
            MigrationType::Sql if by_version.contains_key(version) => MigrationState::Success,
            MigrationType::Sql => match latest_resolved {
                Some(latest) if version < latest => MigrationState::Missing,
                _ => MigrationState::Future,
            },
        };

        by_version.insert(
            version.clone(),
            MigrationInfo {
                version: Some(version.clone()),
                description: row.description.clone(),
                migration_type: row.migration_type,
                state,
                installed_on: row.installed_on,
            },
        );
    }

    by_version.into_values().collect()
}
