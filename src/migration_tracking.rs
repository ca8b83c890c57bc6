pub mod memory;
pub mod postgres;

use crate::config::types::TrackingTable;
use crate::migration::{AppliedMigration, BaselineMarker, MigrationVersion};
use anyhow::Result;

pub use memory::InMemoryTrackingStore;
pub use postgres::PgTrackingStore;

/// Outcome of a conditional baseline marker write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerInsert {
    /// The marker row was written
    Inserted,
    /// Another marker already existed at write time; nothing was written
    MarkerPresent,
    /// Migration history appeared before the write; nothing was written
    HistoryPresent,
}

/// The persistent store recording applied migrations and the baseline marker.
///
/// `add_baseline_marker` must be atomic: it writes only if no marker and no
/// migration history exist at the moment of the write, and reports which
/// condition stopped it otherwise. It never overwrites an existing marker.
#[allow(async_fn_in_trait)]
pub trait TrackingStore {
    /// Human readable name of the store, used in diagnostics
    fn identifier(&self) -> String;

    /// True if any migration other than bookkeeping rows has been recorded
    async fn has_applied_migrations(&self) -> Result<bool>;

    async fn baseline_marker(&self) -> Result<Option<BaselineMarker>>;

    async fn has_baseline_marker(&self) -> Result<bool> {
        Ok(self.baseline_marker().await?.is_some())
    }

    async fn add_baseline_marker(
        &self,
        version: &MigrationVersion,
        description: &str,
    ) -> Result<MarkerInsert>;

    /// Every row of the store, ordered by installed rank
    async fn applied_migrations(&self) -> Result<Vec<AppliedMigration>>;
}

/// Safely format a schema-qualified table name for SQL queries
/// This prevents SQL injection by properly escaping SQL identifiers
pub fn format_tracking_table_name(tracking_table: &TrackingTable) -> Result<String> {
    // PostgreSQL identifier rules: letters, digits, underscore and dollar sign,
    // starting with a letter or underscore
    fn is_valid_sql_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {}
            _ => return false,
        }

        chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }

    if !is_valid_sql_identifier(&tracking_table.schema) {
        return Err(anyhow::anyhow!(
            "Invalid schema name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.schema
        ));
    }

    if !is_valid_sql_identifier(&tracking_table.name) {
        return Err(anyhow::anyhow!(
            "Invalid table name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.name
        ));
    }

    Ok(format!(
        r#""{}"."{}""#,
        tracking_table.schema, tracking_table.name
    ))
}
