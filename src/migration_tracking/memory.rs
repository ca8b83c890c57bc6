use crate::constants::BASELINE_SCRIPT;
use crate::migration::{AppliedMigration, BaselineMarker, MigrationType, MigrationVersion};
use crate::migration_tracking::{MarkerInsert, TrackingStore};
use anyhow::{Result, anyhow};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tracking store kept in process memory.
///
/// Clones share the same rows, so several handles can race against one store.
#[derive(Debug, Clone)]
pub struct InMemoryTrackingStore {
    name: String,
    rows: Arc<Mutex<Vec<AppliedMigration>>>,
}

impl InMemoryTrackingStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a row as if it had been written by a migration run
    pub fn record(&self, mut migration: AppliedMigration) -> Result<()> {
        let mut rows = self.lock()?;
        migration.installed_rank = rows.len() as i32 + 1;
        if migration.installed_on.is_none() {
            migration.installed_on = Some(Utc::now());
        }
        rows.push(migration);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<AppliedMigration>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow!("Tracking store {} is poisoned", self.name))
    }
}

impl TrackingStore for InMemoryTrackingStore {
    fn identifier(&self) -> String {
        self.name.clone()
    }

    async fn has_applied_migrations(&self) -> Result<bool> {
        Ok(self.lock()?.iter().any(|m| m.migration_type.is_history()))
    }

    async fn baseline_marker(&self) -> Result<Option<BaselineMarker>> {
        Ok(self.lock()?.iter().find_map(|m| m.as_baseline_marker()))
    }

    async fn add_baseline_marker(
        &self,
        version: &MigrationVersion,
        description: &str,
    ) -> Result<MarkerInsert> {
        let mut rows = self.lock()?;

        if rows.iter().any(|m| m.migration_type.is_history()) {
            return Ok(MarkerInsert::HistoryPresent);
        }
        if rows.iter().any(|m| m.is_baseline()) {
            return Ok(MarkerInsert::MarkerPresent);
        }

        let mut marker = AppliedMigration::new(
            Some(version.clone()),
            description,
            MigrationType::Baseline,
            BASELINE_SCRIPT,
            None,
            0,
            true,
        );
        marker.installed_rank = rows.len() as i32 + 1;
        marker.installed_on = Some(Utc::now());
        rows.push(marker);

        Ok(MarkerInsert::Inserted)
    }

    async fn applied_migrations(&self) -> Result<Vec<AppliedMigration>> {
        Ok(self.lock()?.clone())
    }
}
